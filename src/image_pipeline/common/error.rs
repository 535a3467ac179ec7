use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Unsupported raw frame size: {0} bytes")]
    UnsupportedFrameSize(usize),
    
    #[error("Short read on sensor line {line}: expected {expected} bytes, {available} available")]
    ShortRead {
        line: usize,
        expected: usize,
        available: usize,
    },
    
    #[error("Degenerate histogram: maximum luminance over the valid region is zero")]
    DegenerateHistogram,
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
