fn main() {
    if let Err(err) = opsbook::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
