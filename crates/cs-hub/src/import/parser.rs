/// One parsed line: positional text cells, untyped.
pub(crate) type Row = Vec<String>;

/// Splits decoded upload text into rows.
///
/// Quoting follows RFC 4180 (`""` inside quotes is a literal quote, quoted
/// cells may hold commas and line breaks) and the reader is lenient: an
/// unterminated quote runs to the end of the input instead of failing.
/// Unquoted cells are trimmed while quoted text is kept as written. A `\r`
/// outside quotes is ignored, so only `\n` ends a row. Empty lines are
/// dropped; lines made only of separators still count as rows.
pub(crate) fn parse_rows(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = strip_unquoted_padding(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(normalized.as_bytes());

    // Reading flexible records from memory has no failure mode.
    reader
        .byte_records()
        .map_while(Result::ok)
        .filter(|record| !(record.len() == 1 && record[0].is_empty()))
        .map(|record| {
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect()
        })
        .collect()
}

/// Removes `\r` and the whitespace around unquoted cells, leaving quoted
/// cells byte for byte. A quote only opens a quoted cell at the start of
/// that cell.
fn strip_unquoted_padding(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut padding = String::new();
    let mut in_quotes = false;
    let mut cell_start = true;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            out.push(ch);
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    out.push('"');
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match ch {
            '\r' => {}
            ',' | '\n' => {
                padding.clear();
                out.push(ch);
                cell_start = true;
            }
            '"' if cell_start => {
                out.push(ch);
                in_quotes = true;
                cell_start = false;
            }
            ch if ch.is_whitespace() => {
                if !cell_start {
                    padding.push(ch);
                }
            }
            _ => {
                out.push_str(&padding);
                padding.clear();
                out.push(ch);
                cell_start = false;
            }
        }
    }

    out
}
