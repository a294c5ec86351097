use std::process::ExitCode;

fn main() -> ExitCode {
    product_catalog_lib::run()
}
