// CSV export of the committed fleet dataset
use crate::domain::fleet::EquipmentSeries;
use crate::domain::period::Period;
use anyhow::Context;

pub const UTF8_BOM: char = '\u{feff}';

fn writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> anyhow::Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))
}

/// Header, one row per day, a blank row, then the monthly averages.
/// Rows follow the first series; a shorter series fills with 0.
pub fn export_csv(series: &[EquipmentSeries]) -> anyhow::Result<String> {
    let mut wtr = writer(Vec::new());

    let header: Vec<String> = std::iter::once("Date".to_string())
        .chain(series.iter().map(|s| format!("{} (PA%)", s.code)))
        .collect();
    wtr.write_record(&header)?;

    if let Some(first) = series.first() {
        for (day, reading) in first.readings().iter().enumerate() {
            let row: Vec<String> = std::iter::once(reading.label.clone())
                .chain(series.iter().map(|s| {
                    let value = s.readings().get(day).map(|r| r.value).unwrap_or(0.0);
                    value.to_string()
                }))
                .collect();
            wtr.write_record(&row)?;
        }
    }

    // The csv writer quotes empty records, so the blank separator line goes in raw.
    let mut buffer = finish(wtr)?;
    buffer.push(b'\n');

    let mut wtr = writer(buffer);
    let averages: Vec<String> = std::iter::once("MONTHLY AVERAGE".to_string())
        .chain(series.iter().map(|s| s.avg().to_string()))
        .collect();
    wtr.write_record(&averages)?;

    let body = String::from_utf8(finish(wtr)?).context("CSV output was not UTF-8")?;
    Ok(format!("{}{}", UTF8_BOM, body.trim_end_matches('\n')))
}

pub fn csv_filename(period: Period) -> String {
    format!(
        "Fleet_Operational_Report_{}_{}.csv",
        period.month_name(),
        period.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::PROFILES;
    use crate::domain::fleet::{generate, DailyReading};

    fn series(profile: usize, values: &[f64]) -> EquipmentSeries {
        let readings = values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyReading::new(format!("{} Jan", i + 1), *v))
            .collect();
        EquipmentSeries::new(&PROFILES[profile], readings).unwrap()
    }

    #[test]
    fn test_two_by_two_export() {
        let fleet = vec![series(0, &[90.0, 95.5]), series(1, &[97.0, 99.0])];
        let csv = export_csv(&fleet).unwrap();

        assert!(csv.starts_with(UTF8_BOM));
        let lines: Vec<&str> = csv.trim_start_matches(UTF8_BOM).split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "Date,DT (PA%),WT (PA%)",
                "1 Jan,90,97",
                "2 Jan,95.5,99",
                "",
                "MONTHLY AVERAGE,92.8,98",
            ]
        );
    }

    #[test]
    fn test_full_month_export() {
        let period = Period::new(1, 2024).unwrap();
        let csv = export_csv(&generate(period.month(), period.year()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        // header + 29 days + blank + averages
        assert_eq!(lines.len(), 32);
        assert!(lines[1].starts_with("1 Feb,"));
        assert_eq!(lines[1].split(',').count(), 6);
        assert!(lines[31].starts_with("MONTHLY AVERAGE,"));
    }

    #[test]
    fn test_empty_fleet_export() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv, format!("{}Date\n\nMONTHLY AVERAGE", UTF8_BOM));
    }

    #[test]
    fn test_csv_filename() {
        let period = Period::new(2, 2026).unwrap();
        assert_eq!(csv_filename(period), "Fleet_Operational_Report_March_2026.csv");
    }
}
