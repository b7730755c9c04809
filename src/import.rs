// src/import.rs
use std::io::Cursor;
use std::path::PathBuf;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;
use tokio::task;

/// Upload cap enforced before a file is handed to the parser.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Header row written into the downloadable template. The parser accepts
/// these spellings (among other aliases), so a filled-in template always
/// round-trips.
pub const TEMPLATE_HEADERS: [&str; 5] =
    ["First Name", "Last Name", "Phone Number", "Email", "Group"];

const TEMPLATE_EXAMPLES: [[&str; 5]; 3] = [
    ["John", "Doe", "(555) 123-4567", "john@example.com", "Family"],
    ["Jane", "Smith", "555-987-6543", "jane@example.com", "Friends"],
    ["Bob", "Johnson", "+1-555-555-5555", "bob@example.com", "Bridal Party"],
];

/// Canonical guest attributes the importer recognizes regardless of how the
/// source file spells its column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
    Group,
}

impl Field {
    /// Wire-convention key, matching the guest record schema.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::PhoneNumber => "phoneNumber",
            Field::Email => "email",
            Field::Group => "group",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::PhoneNumber => "Phone number",
            Field::Email => "Email",
            Field::Group => "Group",
        }
    }

    /// Header spellings accepted for this field, lowercased and trimmed.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::FirstName => &["first name", "firstname", "first_name"],
            Field::LastName => &["last name", "lastname", "last_name", "surname"],
            Field::PhoneNumber => &[
                "phone number",
                "phonenumber",
                "phone_number",
                "phone",
                "cell phone",
                "mobile",
            ],
            Field::Email => &["email", "email address", "e-mail"],
            Field::Group => &["group", "category"],
        }
    }

    fn from_header(normalized: &str) -> Option<Field> {
        const ALL: [Field; 5] = [
            Field::FirstName,
            Field::LastName,
            Field::PhoneNumber,
            Field::Email,
            Field::Group,
        ];
        ALL.into_iter()
            .find(|field| field.aliases().contains(&normalized))
    }
}

/// One guest built from a data row. Produced for every non-blank row, even
/// when the row fails validation; validity is tracked through the error list,
/// not by omission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestRow {
    /// 1-based position among the data rows of the sheet (header excluded).
    pub row: u32,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub group: String,
}

impl GuestRow {
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    FieldRequired,
    InvalidFormat,
}

/// A recoverable defect attached to one data row. Never aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: u32,
    pub field: Field,
    pub kind: RowErrorKind,
    pub value: String,
}

impl RowError {
    fn required(row: u32, field: Field) -> Self {
        RowError {
            row,
            field,
            kind: RowErrorKind::FieldRequired,
            value: String::new(),
        }
    }

    fn invalid(row: u32, field: Field, value: &str) -> Self {
        RowError {
            row,
            field,
            kind: RowErrorKind::InvalidFormat,
            value: value.to_string(),
        }
    }

    pub fn message(&self) -> String {
        match self.kind {
            RowErrorKind::FieldRequired => format!("{} is required", self.field.label()),
            RowErrorKind::InvalidFormat => {
                format!("Invalid {} format", self.field.label().to_lowercase())
            }
        }
    }
}

/// Structural failures that prevent any usable result.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read the file as a spreadsheet: {0}")]
    UnreadableWorkbook(String),
    #[error("the file must contain a header row and at least one guest row")]
    EmptyOrHeaderOnlyFile,
    #[error("no recognizable columns in the header row; expected headers like First Name, Phone Number")]
    HeaderRowUnrecognized,
    #[error("the file is {bytes} bytes; the upload limit is 10 MB")]
    FileTooLarge { bytes: u64 },
    #[error("could not generate the template workbook: {0}")]
    TemplateWrite(#[from] rust_xlsxwriter::XlsxError),
}

/// Outcome of one parse: every produced guest row plus every row-level
/// error, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub rows: Vec<GuestRow>,
    pub errors: Vec<RowError>,
}

impl ImportResult {
    pub fn row_is_valid(&self, row: u32) -> bool {
        !self.errors.iter().any(|error| error.row == row)
    }

    /// Rows with zero associated errors. The commit action stays disabled
    /// while this is zero.
    pub fn valid_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|guest| self.row_is_valid(guest.row))
            .count()
    }

    pub fn valid_rows(&self) -> impl Iterator<Item = &GuestRow> {
        self.rows
            .iter()
            .filter(|guest| self.row_is_valid(guest.row))
    }
}

/// Read and parse an uploaded file off the UI thread, rejecting oversized
/// files before the parser runs.
pub async fn parse_path(path: PathBuf) -> Result<ImportResult, ImportError> {
    task::spawn_blocking(move || {
        let metadata = std::fs::metadata(&path)
            .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(ImportError::FileTooLarge {
                bytes: metadata.len(),
            });
        }
        let bytes =
            std::fs::read(&path).map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;
        parse(&bytes)
    })
    .await
    .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?
}

/// Parse a spreadsheet into a reviewable guest list, surfacing every defect
/// found instead of stopping at the first one. Deterministic: the same bytes
/// always produce the same result.
pub fn parse(bytes: &[u8]) -> Result<ImportResult, ImportError> {
    let grid = decode(bytes)?;
    map_and_validate(&grid)
}

fn decode(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    if looks_like_workbook(bytes) {
        decode_workbook(bytes)
    } else {
        decode_delimited(bytes)
    }
}

// ZIP magic (xlsx) or OLE compound-file magic (legacy xls).
fn looks_like_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xd0, 0xcf, 0x11, 0xe0])
}

fn decode_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::UnreadableWorkbook("the workbook has no sheets".into()))?
        .map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Excel stores phone-looking numbers as floats; render them without
        // a trailing ".0" so digit counting still works.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn decode_delimited(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    // First check if the file uses comma or semicolon as delimiter
    let delimiter = detect_delimiter(bytes);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::UnreadableWorkbook(e.to_string()))?;
        grid.push(record.iter().map(String::from).collect());
    }
    Ok(grid)
}

fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    if first_line.contains(&b';') {
        b';'
    } else {
        b','
    }
}

fn map_and_validate(grid: &[Vec<String>]) -> Result<ImportResult, ImportError> {
    if grid.len() < 2 {
        return Err(ImportError::EmptyOrHeaderOnlyFile);
    }

    let columns = bind_columns(&grid[0])?;

    let mut result = ImportResult::default();
    for (position, row) in grid[1..].iter().enumerate() {
        let row_number = position as u32 + 1;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut guest = GuestRow {
            row: row_number,
            ..GuestRow::default()
        };
        for &(index, field) in &columns {
            let value = row.get(index).map(|cell| cell.trim()).unwrap_or("");
            match field {
                Field::FirstName => guest.first_name = value.to_string(),
                Field::LastName => guest.last_name = value.to_string(),
                Field::PhoneNumber => guest.phone_number = value.to_string(),
                Field::Email => guest.email = value.to_string(),
                Field::Group => guest.group = value.to_string(),
            }
        }

        validate_row(&mut guest, &mut result.errors);
        result.rows.push(guest);
    }

    Ok(result)
}

/// Bind header cells to canonical fields by alias, independent of column
/// order. The first column matching a field wins; unmatched fields stay
/// unpopulated for every row.
fn bind_columns(header: &[String]) -> Result<Vec<(usize, Field)>, ImportError> {
    let mut columns: Vec<(usize, Field)> = Vec::new();
    for (index, cell) in header.iter().enumerate() {
        let normalized = cell.trim().to_lowercase();
        if let Some(field) = Field::from_header(&normalized) {
            if columns.iter().all(|&(_, bound)| bound != field) {
                columns.push((index, field));
            }
        }
    }

    if columns.is_empty() {
        return Err(ImportError::HeaderRowUnrecognized);
    }
    Ok(columns)
}

fn validate_row(guest: &mut GuestRow, errors: &mut Vec<RowError>) {
    if guest.first_name.is_empty() {
        errors.push(RowError::required(guest.row, Field::FirstName));
    }

    if guest.phone_number.is_empty() {
        errors.push(RowError::required(guest.row, Field::PhoneNumber));
    } else {
        match normalize_phone(&guest.phone_number) {
            Some(normalized) => guest.phone_number = normalized,
            None => errors.push(RowError::invalid(
                guest.row,
                Field::PhoneNumber,
                &guest.phone_number,
            )),
        }
    }

    if !guest.email.is_empty() && !is_valid_email(&guest.email) {
        errors.push(RowError::invalid(guest.row, Field::Email, &guest.email));
    }
}

/// Normalize a US phone number to `+1` followed by ten digits. Accepts any
/// punctuation; exactly 10 digits, or 11 digits with a leading 1, qualify.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Some(format!("+1{digits}"))
    } else if digits.len() == 11 && digits.starts_with('1') {
        Some(format!("+1{}", &digits[1..]))
    } else {
        None
    }
}

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_SHAPE.is_match(raw)
}

/// Build the downloadable .xlsx template: the canonical header row plus a
/// few example guests.
pub fn template_workbook() -> Result<Vec<u8>, ImportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Guest List Template")?;

    let bold = Format::new().set_bold();
    for (column, header) in TEMPLATE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, column as u16, *header, &bold)?;
    }
    for (row, example) in TEMPLATE_EXAMPLES.iter().enumerate() {
        for (column, value) in example.iter().enumerate() {
            sheet.write_string(row as u32 + 1, column as u16, *value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(body: &str) -> Vec<u8> {
        body.as_bytes().to_vec()
    }

    const HEADER: &str = "First Name,Last Name,Phone Number,Email,Group\n";

    #[test]
    fn empty_file_is_fatal() {
        let err = parse(&[]).unwrap_err();
        assert!(matches!(err, ImportError::EmptyOrHeaderOnlyFile));
    }

    #[test]
    fn header_only_file_is_fatal() {
        let err = parse(&csv(HEADER)).unwrap_err();
        assert!(matches!(err, ImportError::EmptyOrHeaderOnlyFile));
    }

    #[test]
    fn unrecognizable_header_is_fatal() {
        let err = parse(&csv("Foo,Bar,Baz\n1,2,3\n")).unwrap_err();
        assert!(matches!(err, ImportError::HeaderRowUnrecognized));
    }

    #[test]
    fn phone_normalization_accepts_common_punctuation() {
        for raw in ["(555) 123-4567", "555-123-4567", "5551234567", "555.123.4567"] {
            assert_eq!(normalize_phone(raw).as_deref(), Some("+15551234567"), "{raw}");
        }
    }

    #[test]
    fn phone_normalization_accepts_eleven_digits_with_leading_one() {
        assert_eq!(
            normalize_phone("15551234567").as_deref(),
            Some("+15551234567")
        );
        assert_eq!(
            normalize_phone("+1-555-555-5555").as_deref(),
            Some("+15555555555")
        );
    }

    #[test]
    fn phone_normalization_rejects_wrong_digit_counts() {
        assert_eq!(normalize_phone("555-123-456"), None); // 9 digits
        assert_eq!(normalize_phone("555512345678"), None); // 12 digits
        assert_eq!(normalize_phone("25551234567"), None); // 11, no leading 1
    }

    #[test]
    fn invalid_phone_keeps_submitted_value_and_reports_one_error() {
        let result = parse(&csv(&format!("{HEADER}Jane,Doe,12345,,\n"))).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].phone_number, "12345");
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.row, 1);
        assert_eq!(error.field, Field::PhoneNumber);
        assert_eq!(error.kind, RowErrorKind::InvalidFormat);
        assert_eq!(error.value, "12345");
    }

    #[test]
    fn blank_email_is_not_an_error() {
        let result = parse(&csv(&format!("{HEADER}Jane,Doe,555-987-6543,,\n"))).unwrap();
        assert!(result.errors.is_empty());
    }

    #[test]
    fn email_without_at_sign_is_one_invalid_format_error() {
        let result = parse(&csv(&format!(
            "{HEADER}Jane,Doe,555-987-6543,not-an-email,\n"
        )))
        .unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, Field::Email);
        assert_eq!(result.errors[0].kind, RowErrorKind::InvalidFormat);
    }

    #[test]
    fn email_shape_requires_domain_dot() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
    }

    #[test]
    fn missing_required_fields_still_produce_a_record() {
        let result = parse(&csv(&format!("{HEADER},,,,\nOnly,,,\n"))).unwrap();
        // Row 1 is all-blank and skipped entirely; row 2 lacks a phone.
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].row, 2);
        assert_eq!(result.rows[0].first_name, "Only");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, Field::PhoneNumber);
        assert_eq!(result.errors[0].kind, RowErrorKind::FieldRequired);
    }

    #[test]
    fn blank_rows_are_skipped_but_keep_their_position() {
        let body = format!(
            "{HEADER}Amy,Pond,555-111-2222,,\n,,,,\nRory,Williams,bad,,\nRiver,Song,555-333-4444,,\n"
        );
        let result = parse(&csv(&body)).unwrap();
        assert_eq!(result.rows.len(), 3);
        let numbers: Vec<u32> = result.rows.iter().map(|g| g.row).collect();
        assert_eq!(numbers, vec![1, 3, 4]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(result.valid_count(), 2);
    }

    #[test]
    fn header_aliases_bind_regardless_of_column_order() {
        let body = "Mobile;Surname;First Name\n555-987-6543;Doe;Jane\n";
        let result = parse(&csv(body)).unwrap();
        assert_eq!(result.rows.len(), 1);
        let guest = &result.rows[0];
        assert_eq!(guest.first_name, "Jane");
        assert_eq!(guest.last_name, "Doe");
        assert_eq!(guest.phone_number, "+15559876543");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn unmatched_fields_stay_unpopulated() {
        let result = parse(&csv("First Name,Phone\nJane,555-987-6543\n")).unwrap();
        let guest = &result.rows[0];
        assert_eq!(guest.last_name, "");
        assert_eq!(guest.email, "");
        assert_eq!(guest.group, "");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn concrete_scenario_jane_doe() {
        let result = parse(&csv(&format!(
            "{HEADER}Jane,Doe,555-987-6543,,Friends\n"
        )))
        .unwrap();
        assert_eq!(
            result.rows,
            vec![GuestRow {
                row: 1,
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                phone_number: "+15559876543".into(),
                email: String::new(),
                group: "Friends".into(),
            }]
        );
        assert!(result.errors.is_empty());
        assert_eq!(result.valid_count(), 1);
    }

    #[test]
    fn multiple_defects_on_one_row_are_all_reported() {
        let result = parse(&csv(&format!("{HEADER},Doe,12,zzz,\n"))).unwrap();
        assert_eq!(result.rows.len(), 1);
        let fields: Vec<Field> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![Field::FirstName, Field::PhoneNumber, Field::Email]
        );
        assert_eq!(result.valid_count(), 0);
    }

    #[test]
    fn parsing_is_deterministic() {
        let body = csv(&format!("{HEADER}Jane,Doe,555-987-6543,j@x.co,Friends\n,,,\nBob,,99,,\n"));
        assert_eq!(parse(&body).unwrap(), parse(&body).unwrap());
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let bytes = template_workbook().unwrap();
        let result = parse(&bytes).unwrap();
        assert_eq!(result.rows.len(), 3);
        assert!(result.errors.is_empty());
        assert_eq!(result.valid_count(), 3);
        assert_eq!(result.rows[0].phone_number, "+15551234567");
        assert_eq!(result.rows[2].phone_number, "+15555555555");
        assert_eq!(result.rows[1].group, "Friends");
    }

    #[test]
    fn error_messages_match_the_review_ui_copy() {
        let required = RowError::required(1, Field::FirstName);
        assert_eq!(required.message(), "First name is required");
        let invalid = RowError::invalid(2, Field::PhoneNumber, "12");
        assert_eq!(invalid.message(), "Invalid phone number format");
    }
}
