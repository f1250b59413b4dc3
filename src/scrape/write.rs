use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::extraction::types::ScholarshipRecord;

pub const COLUMNS: [&str; 8] = ["state", "university", "name", "details", "eligibility", "amount", "deadline", "link"];

/// Header row first, one record per row, UTF-8.
pub fn write_records<W: io::Write>(w: W, records: &[ScholarshipRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    if records.is_empty() {
        writer.write_record(COLUMNS).context("write csv header")?;
    }
    for rec in records {
        writer.serialize(rec).context("write scholarship row")?;
    }
    writer.flush().context("flush csv")?;
    Ok(())
}

pub fn write_records_to_path(path: &Path, records: &[ScholarshipRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {:?}", parent))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("create {:?}", path))?;
    write_records(io::BufWriter::new(file), records)
        .with_context(|| format!("write records to {:?}", path))
}

pub fn read_records<R: io::Read>(r: R) -> Result<Vec<ScholarshipRecord>> {
    let mut reader = csv::Reader::from_reader(r);
    let mut out = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let rec: ScholarshipRecord = row.with_context(|| format!("parse csv row {}", i + 1))?;
        out.push(rec);
    }
    Ok(out)
}

pub fn read_records_from_path(path: &Path) -> Result<Vec<ScholarshipRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open {:?}", path))?;
    read_records(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::types::Source;

    fn record() -> ScholarshipRecord {
        let src = Source::new("Christ University", "https://christuniversity.in/scholarships", "Karnataka");
        let mut r = ScholarshipRecord::open(&src, "Merit, Sports & \"Arts\"", &src.url);
        r.details = "Rank | Waiver 1-10 | 100% ".into();
        r.amount = "up to ₹20,000 ".into();
        r
    }

    #[test]
    fn header_has_fixed_columns() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[record()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn empty_output_still_has_header() {
        let mut buf = Vec::new();
        write_records(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", COLUMNS.join(",")));
    }

    #[test]
    fn file_round_trip_keeps_quotes_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("scholarships.csv");
        write_records_to_path(&path, &[record()]).unwrap();
        let back = read_records_from_path(&path).unwrap();
        assert_eq!(back, vec![record()]);
    }
}
