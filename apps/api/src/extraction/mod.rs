// Document text extraction. Feeds plain text to the matching engine;
// the engine itself never touches file formats.

pub mod pdf;
