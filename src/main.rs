fn main() {
    if let Err(err) = physbot::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
