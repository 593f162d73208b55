//! Pluggable table formatters.
//!
//! A [`TableFormatter`] renders a header line once and then one line per
//! row. Three concrete encodings are provided:
//!
//! - [`TextTableFormatter`]: fields right-justified to width 10, with a dashed rule under the headers
//! - [`CsvTableFormatter`]: comma-joined fields. Embedded commas are not escaped.
//! - [`HtmlTableFormatter`]: one `<tr>` per line with `<th>`/`<td>` cells
//!
//! Decoration layers wrap any formatter and transform the data before
//! handing it inward:
//!
//! - [`ColumnFormat`] renders each value through a printf-style spec
//! - [`UpperHeaders`] upper-cases the header names
//!
//! [`create_formatter`] assembles the stack with the concrete encoding
//! innermost.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::printf::FormatSpec;
use crate::data::value::Value;
use crate::error::TabkitError;
use crate::Result;

/// Column width used by the text encoding
pub const TEXT_WIDTH: usize = 10;

/// Strategy for rendering headers and rows.
pub trait TableFormatter {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()>;
    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()>;
}

impl<F: TableFormatter + ?Sized> TableFormatter for Box<F> {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        (**self).headings(out, headers)
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        (**self).row(out, values)
    }
}

impl<F: TableFormatter + ?Sized> TableFormatter for &F {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        (**self).headings(out, headers)
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        (**self).row(out, values)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextTableFormatter;

impl TextTableFormatter {
    fn justified<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
        items
            .map(|item| format!("{:>width$}", item.to_string(), width = TEXT_WIDTH))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TableFormatter for TextTableFormatter {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        writeln!(out, "{}", Self::justified(headers.iter()))?;
        let rule = format!("{} ", "-".repeat(TEXT_WIDTH));
        writeln!(out, "{}", rule.repeat(headers.len()))?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        writeln!(out, "{}", Self::justified(values.iter()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableFormatter;

impl TableFormatter for CsvTableFormatter {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        writeln!(out, "{}", headers.join(","))?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        let fields: Vec<String> = values.iter().map(Value::to_string).collect();
        writeln!(out, "{}", fields.join(","))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableFormatter;

impl HtmlTableFormatter {
    fn line<T: fmt::Display>(tag: &str, items: impl Iterator<Item = T>) -> String {
        let cells: Vec<String> = items
            .map(|item| format!("<{tag}>{item}</{tag}>"))
            .collect();
        format!("<tr>  {} </tr>", cells.join(" "))
    }
}

impl TableFormatter for HtmlTableFormatter {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        writeln!(out, "{}", Self::line("th", headers.iter()))?;
        Ok(())
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        writeln!(out, "{}", Self::line("td", values.iter()))?;
        Ok(())
    }
}

/// Renders row values through per-column format specs before delegating.
///
/// Values past the last spec are passed through unchanged.
#[derive(Debug, Clone)]
pub struct ColumnFormat<F> {
    inner: F,
    formats: Vec<FormatSpec>,
}

impl<F: TableFormatter> ColumnFormat<F> {
    pub fn new(inner: F, formats: Vec<FormatSpec>) -> Self {
        Self { inner, formats }
    }
}

impl<F: TableFormatter> TableFormatter for ColumnFormat<F> {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        self.inner.headings(out, headers)
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        let formatted = values
            .iter()
            .enumerate()
            .map(|(i, value)| match self.formats.get(i) {
                Some(spec) => spec.apply(value).map(Value::from),
                None => Ok(value.clone()),
            })
            .collect::<Result<Vec<Value>>>()?;
        self.inner.row(out, &formatted)
    }
}

/// Upper-cases header names before delegating.
#[derive(Debug, Clone)]
pub struct UpperHeaders<F> {
    inner: F,
}

impl<F: TableFormatter> UpperHeaders<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: TableFormatter> TableFormatter for UpperHeaders<F> {
    fn headings(&self, out: &mut dyn Write, headers: &[String]) -> Result<()> {
        let upper: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
        self.inner.headings(out, &upper)
    }

    fn row(&self, out: &mut dyn Write, values: &[Value]) -> Result<()> {
        self.inner.row(out, values)
    }
}

/// Concrete table encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Text,
    Csv,
    Html,
}

impl FormatKind {
    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Text => "text",
            FormatKind::Csv => "csv",
            FormatKind::Html => "html",
        }
    }

    fn formatter(&self) -> Box<dyn TableFormatter> {
        match self {
            FormatKind::Text => Box::new(TextTableFormatter),
            FormatKind::Csv => Box::new(CsvTableFormatter),
            FormatKind::Html => Box::new(HtmlTableFormatter),
        }
    }
}

impl FromStr for FormatKind {
    type Err = TabkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(FormatKind::Text),
            "csv" => Ok(FormatKind::Csv),
            "html" => Ok(FormatKind::Html),
            _ => Err(TabkitError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a formatter for `kind`, wrapped in the requested decorations.
///
/// Format specs are parsed up front, so a bad spec fails here rather
/// than halfway through a table.
pub fn create_formatter<S: AsRef<str>>(
    kind: FormatKind,
    column_formats: &[S],
    upper_headers: bool,
) -> Result<Box<dyn TableFormatter>> {
    let mut formatter = kind.formatter();
    if upper_headers {
        formatter = Box::new(UpperHeaders::new(formatter));
    }
    if !column_formats.is_empty() {
        let specs = column_formats
            .iter()
            .map(|s| FormatSpec::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        formatter = Box::new(ColumnFormat::new(formatter, specs));
    }
    Ok(formatter)
}

/// Same as [`create_formatter`] with the encoding given by name.
pub fn create_formatter_named<S: AsRef<str>>(
    name: &str,
    column_formats: &[S],
    upper_headers: bool,
) -> Result<Box<dyn TableFormatter>> {
    create_formatter(name.parse()?, column_formats, upper_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FORMATS: &[&str] = &[];

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn render(formatter: &dyn TableFormatter) -> String {
        let mut out = Vec::new();
        formatter
            .headings(&mut out, &headers(&["name", "shares"]))
            .unwrap();
        formatter
            .row(&mut out, &[Value::from("AA"), Value::Int(100)])
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_formatter() {
        assert_eq!(
            render(&TextTableFormatter),
            "      name     shares\n\
             ---------- ---------- \n        \
             AA        100\n"
        );
    }

    #[test]
    fn test_csv_formatter() {
        assert_eq!(render(&CsvTableFormatter), "name,shares\nAA,100\n");
    }

    #[test]
    fn test_csv_does_not_escape_commas() {
        let mut out = Vec::new();
        CsvTableFormatter
            .row(&mut out, &[Value::from("Smith, J"), Value::Int(1)])
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Smith, J,1\n");
    }

    #[test]
    fn test_html_formatter() {
        assert_eq!(
            render(&HtmlTableFormatter),
            "<tr>  <th>name</th> <th>shares</th> </tr>\n\
             <tr>  <td>AA</td> <td>100</td> </tr>\n"
        );
    }

    #[test]
    fn test_upper_headers_over_text() {
        let formatter = UpperHeaders::new(TextTableFormatter);
        let mut out = Vec::new();
        formatter.headings(&mut out, &headers(&["name"])).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("NAME"));
        assert!(!text.contains("name"));
    }

    #[test]
    fn test_column_format_over_csv() {
        let specs = vec![
            FormatSpec::parse("%s").unwrap(),
            FormatSpec::parse("%d").unwrap(),
            FormatSpec::parse("%0.2f").unwrap(),
        ];
        let formatter = ColumnFormat::new(CsvTableFormatter, specs);
        let mut out = Vec::new();
        formatter
            .row(
                &mut out,
                &[Value::from("AA"), Value::Int(100), Value::Float(32.2)],
            )
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "AA,100,32.20\n");
    }

    #[test]
    fn test_column_format_passes_extra_values_through() {
        let formatter = ColumnFormat::new(
            CsvTableFormatter,
            vec![FormatSpec::parse("[%s]").unwrap()],
        );
        let mut out = Vec::new();
        formatter
            .row(&mut out, &[Value::from("AA"), Value::Float(1.0)])
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[AA],1.0\n");
    }

    #[test]
    fn test_column_format_mismatch_writes_nothing() {
        let formatter = ColumnFormat::new(
            CsvTableFormatter,
            vec![FormatSpec::parse("%d").unwrap()],
        );
        let mut out = Vec::new();
        let err = formatter.row(&mut out, &[Value::from("AA")]).unwrap_err();
        assert!(matches!(err, TabkitError::Format(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_create_formatter_layers() {
        let formatter = create_formatter(FormatKind::Csv, &["%s", "%05d"], true).unwrap();
        assert_eq!(render(formatter.as_ref()), "NAME,SHARES\nAA,00100\n");

        let plain = create_formatter(FormatKind::Html, NO_FORMATS, false).unwrap();
        assert_eq!(render(plain.as_ref()), render(&HtmlTableFormatter));
    }

    #[test]
    fn test_create_formatter_rejects_bad_spec() {
        assert!(matches!(
            create_formatter(FormatKind::Text, &["%q"], false),
            Err(TabkitError::Format(_))
        ));
    }

    #[test]
    fn test_create_formatter_named() {
        assert!(create_formatter_named("html", NO_FORMATS, false).is_ok());
        assert!(matches!(
            create_formatter_named("xml", NO_FORMATS, false),
            Err(TabkitError::UnknownFormat(name)) if name == "xml"
        ));
    }

    #[test]
    fn test_format_kind_from_str() {
        assert_eq!(FormatKind::from_str("TEXT").unwrap(), FormatKind::Text);
        assert_eq!(FormatKind::from_str("csv").unwrap(), FormatKind::Csv);
        assert_eq!(FormatKind::from_str("html").unwrap(), FormatKind::Html);
        assert!(FormatKind::from_str("pdf").is_err());
    }
}
