fn main() {
    // include_dir! embeds frontend/ at compile time, but cargo doesn't
    // track non-Rust files automatically.
    println!("cargo:rerun-if-changed=frontend");
}
