use encoding_rs::{UTF_8, WINDOWS_1252};

/// Decode raw bytes to a string, assuming UTF-8 and falling back to
/// Windows-1252 when the bytes are not valid UTF-8. Legacy exports from
/// word processors are the usual source of non-UTF-8 text files.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }
    let (decoded, _, _) = WINDOWS_1252.decode(bytes);
    decoded.into_owned()
}

/// Flatten CSV content for word-by-word presentation: cells of each line
/// are joined with single spaces, one line per record.
pub fn flatten_csv(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
