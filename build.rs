use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=config.toml");
    println!("cargo:rerun-if-changed=brushes.json");

    // OUT_DIR is target/<profile>/build/<crate>/out; the binary lives three levels up
    let out_dir = env::var("OUT_DIR").unwrap();
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .unwrap()
        .to_path_buf();

    // Ship the config and the sample brush catalog next to the binary
    for file in ["config.toml", "brushes.json"] {
        let source = Path::new(file);
        if source.exists() {
            fs::copy(source, target_dir.join(file)).unwrap();
        }
    }
}
