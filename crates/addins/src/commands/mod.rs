pub mod candidates;
pub mod list;
pub mod points;

pub use candidates::*;
pub use list::*;
pub use points::*;

use starbase::AppResult;

/// Print a command's report, or its error with a failing exit code
fn finish(report: anyhow::Result<String>) -> AppResult {
    match report {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            Ok(None)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            Ok(Some(1))
        }
    }
}
