//! modraw-sim binary.

fn main() {
    let code = modraw_core::cli::run();
    std::process::exit(code.as_i32());
}
