//! Retrieves information about the version of the crate from Git and the build
//! environment. This information is then written to a file in the output
//! directory and can be accessed at runtime by the binary.

use std::path::Path;
use std::{env, fs};

fn generate_file(filename: &str, contents: &str) -> std::io::Result<()> {
    let out_dir = env::var_os("OUT_DIR").unwrap_or_default();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents)
}

fn generate_build_info() -> std::io::Result<()> {
    let profile = env::var("PROFILE").unwrap_or_else(|_| String::from("unknown"));
    let assertions = if cfg!(debug_assertions) { "+" } else { "-" };
    generate_file(
        "features",
        &format!("{profile} {assertions}debug_assertions"),
    )
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info()?;
    shadow_rs::new()
}
