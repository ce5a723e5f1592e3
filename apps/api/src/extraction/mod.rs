// Resume text extraction. PDF is the only supported upload format.

pub mod pdf;
