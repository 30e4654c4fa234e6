use std::env;
use std::path::Path;
use std::process;

use hackasm::assemble;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: asm <file.asm>");
        process::exit(1);
    }

    match assemble(Path::new(&args[1])) {
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
