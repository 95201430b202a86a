use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
    #[error("No unused transaction id found after {attempts} attempts ({allocated} ids allocated)")]
    IdSpaceExhausted { attempts: u32, allocated: usize },
}
