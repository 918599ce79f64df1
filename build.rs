fn main() {
    // Exports ESP-IDF link args when the espidf feature is active; host
    // test builds (--no-default-features) skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
