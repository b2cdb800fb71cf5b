fn main() {
    if let Err(err) = raw_schema_gen::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
