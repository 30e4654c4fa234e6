use std::env;
use std::path::Path;
use std::process;

use vmtranslate::translate;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: vmt <file.vm | dir>");
        process::exit(1);
    }

    match translate(Path::new(&args[1])) {
        Ok(output_path) => {
            println!("wrote {}", output_path.display());
        }
        Err(errors) => {
            for err in &errors {
                eprintln!("{err}");
            }
            process::exit(1);
        }
    }
}
