//! Delimited table loader with encoding and delimiter auto-detection.
//!
//! Reads the whole input into memory, selects the recipe columns and keeps
//! every cell as text. Cells holding a missing-value marker become `None`.
//! No field parsing happens here.

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{Column, RawRecipe};

/// Bytes inspected by charset detection when the input is not valid UTF-8.
const ENCODING_SAMPLE_LEN: usize = 64 * 1024;

/// Cell texts read as missing values.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Selected rows, in file order
    pub rows: Vec<RawRecipe>,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// All column headers of the input, before selection
    pub headers: Vec<String>,
}

/// Whether a raw cell counts as a missing value.
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 short-circuits; otherwise chardet looks at a leading sample.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_LEN)];
    let charset = chardet::detect(sample).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let encoding_err = || LoadError::Encoding {
        encoding: encoding.to_string(),
    };

    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec()).map_err(|_| encoding_err())?,
        // Latin-1 labels resolve to windows-1252, which agrees on every printable byte
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes()).ok_or_else(encoding_err)?;
            let (decoded, _, had_errors) = codec.decode(bytes);
            if had_errors {
                return Err(encoding_err());
            }
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Display form of a delimiter for progress output.
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Load a table file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = load_table_file("RAW_recipes.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.rows.len());
/// ```
pub fn load_table_file<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    load_table_bytes(&bytes)
}

/// Load table bytes with auto-detection of encoding and delimiter.
pub fn load_table_bytes(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    parse_table(&content, delimiter, encoding)
}

/// Parse table text with an explicit delimiter and select the recipe columns.
///
/// Quoted cells may contain delimiters and line breaks. A data row with more
/// cells than the header is a fatal error; a shorter row has its trailing
/// cells treated as missing. Blank lines are skipped.
pub fn parse_table(content: &str, delimiter: char, encoding: String) -> LoadResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let delimiter_byte = u8::try_from(delimiter).map_err(|_| LoadError::Malformed {
        line: 1,
        message: format!("unsupported delimiter '{}'", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(1, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let selection = select_columns(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            malformed(line, e)
        })?;

        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(LoadError::Malformed {
                line,
                message: format!("expected {} fields, saw {}", headers.len(), record.len()),
            });
        }

        let mut row = RawRecipe::default();
        for &(column, index) in &selection {
            *row.cell_mut(column) = record
                .get(index)
                .filter(|cell| !is_missing(cell))
                .map(str::to_string);
        }
        rows.push(row);
    }

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

/// Map each retained column to its position in `headers`.
///
/// Duplicate header names resolve to the first occurrence.
pub fn select_columns(headers: &[String]) -> LoadResult<Vec<(Column, usize)>> {
    Column::ALL
        .iter()
        .map(|&column| {
            headers
                .iter()
                .position(|h| h == column.header())
                .map(|index| (column, index))
                .ok_or_else(|| LoadError::MissingColumn(column.header().to_string()))
        })
        .collect()
}

fn malformed(line: u64, err: impl std::fmt::Display) -> LoadError {
    LoadError::Malformed {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,id,minutes,contributor_id,submitted,tags,nutrition,n_steps,steps,description,ingredients,n_ingredients";

    fn parse(csv: &str) -> LoadResult<ParseResult> {
        parse_table(csv, ',', "utf-8".to_string())
    }

    #[test]
    fn test_selects_recipe_columns() {
        let csv = format!(
            "{}\narriba baked squash,137739,55,47892,2005-09-16,\"['60-minutes-or-less']\",\"[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]\",11,\"['make a choice', 'bake']\",autumn is my favorite,\"['winter squash', 'salt']\",2",
            HEADER
        );
        let result = parse(&csv).unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.headers.len(), 12);
        let row = &result.rows[0];
        assert_eq!(row.name.as_deref(), Some("arriba baked squash"));
        assert_eq!(row.minutes.as_deref(), Some("55"));
        assert_eq!(row.nutrition.as_deref(), Some("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]"));
        assert_eq!(row.steps.as_deref(), Some("['make a choice', 'bake']"));
        assert_eq!(row.description.as_deref(), Some("autumn is my favorite"));
        assert_eq!(row.ingredients.as_deref(), Some("['winter squash', 'salt']"));
    }

    #[test]
    fn test_quoted_cell_with_newline() {
        let csv = "name,ingredients,nutrition,steps,description,minutes\n\
                   soup,\"['water']\",\"[1,2,3,4,5,6,7]\",\"['boil']\",\"line one\nline two\",10\n";
        let result = parse(csv).unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].description.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_missing_markers_become_none() {
        let csv = "name,ingredients,nutrition,steps,description,minutes\n\
                   NA,,\"[1,2,3,4,5,6,7]\",null,nan,5\n";
        let row = &parse(csv).unwrap().rows[0];

        assert_eq!(row.name, None);
        assert_eq!(row.ingredients, None);
        assert_eq!(row.steps, None);
        assert_eq!(row.description, None);
        assert_eq!(row.minutes.as_deref(), Some("5"));
    }

    #[test]
    fn test_short_row_padded_with_missing() {
        let csv = "name,ingredients,nutrition,steps,description,minutes\ntoast,\"['bread']\"\n";
        let row = &parse(csv).unwrap().rows[0];

        assert_eq!(row.name.as_deref(), Some("toast"));
        assert_eq!(row.nutrition, None);
        assert_eq!(row.minutes, None);
    }

    #[test]
    fn test_long_row_is_fatal() {
        let csv = "name,ingredients,nutrition,steps,description,minutes\na,b,c,d,e,f,g\n";
        let err = parse(csv).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("expected 6 fields, saw 7"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "name,ingredients,steps,description,minutes\na,b,c,d,1\n";
        let err = parse(csv).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "nutrition"));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(parse("").unwrap_err(), LoadError::EmptyFile));
        assert!(matches!(load_table_bytes(b"").unwrap_err(), LoadError::EmptyFile));
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let result = parse("name,ingredients,nutrition,steps,description,minutes\n").unwrap();
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "name,ingredients,nutrition,steps,description,minutes\n\
                   a,x,y,z,d,1\n\nb,x,y,z,d,2\n";
        assert_eq!(parse(csv).unwrap().rows.len(), 2);
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_auto_load_semicolon() {
        let csv = "name;ingredients;nutrition;steps;description;minutes\nsalad;x;y;z;fresh;3";
        let result = load_table_bytes(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.rows[0].description.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let csv = "\u{feff}name,ingredients,nutrition,steps,description,minutes\na,b,c,d,e,1";
        let result = load_table_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.headers[0], "name");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Crème" in ISO-8859-1
        let bytes: &[u8] = &[0x43, 0x72, 0xE8, 0x6D, 0x65];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Crème");
    }

    #[test]
    fn test_latin1_symbols_not_read_as_latin9() {
        // 0xA4 and 0xBD differ between ISO-8859-1 and ISO-8859-15
        let decoded = decode_content(&[0x31, 0xA4, 0xBD], "iso-8859-1").unwrap();
        assert_eq!(decoded, "1¤½");
        assert_eq!(decode_content(&[0xBD], "latin1").unwrap(), "½");
    }

    #[test]
    fn test_latin9_label_decodes_as_latin9() {
        assert_eq!(decode_content(&[0xA4], "iso-8859-15").unwrap(), "€");
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "TAB");
        assert_eq!(format_delimiter(';'), ";");
    }

    #[test]
    fn test_invalid_utf8_rejected_when_declared_utf8() {
        let err = decode_content(&[0x66, 0xFF, 0x6F], "utf-8").unwrap_err();
        assert!(matches!(err, LoadError::Encoding { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_table_file("/definitely/not/here/RAW_recipes.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
