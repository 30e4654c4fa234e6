use std::env;
use std::path::Path;
use std::process;

use jackc::compile;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: jackc <file.jack | dir>");
        process::exit(1);
    }

    match compile(Path::new(&args[1])) {
        Ok(output_paths) => {
            for path in &output_paths {
                println!("wrote {}", path.display());
            }
        }
        Err(errors) => {
            for err in &errors {
                eprintln!("{err}");
            }
            process::exit(1);
        }
    }
}
