//! Tab-separated dump of the attached series, one sample pair of columns
//! per view. Intended for spreadsheet import, so rows align by sample
//! index and short series leave their cells blank.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};

use crate::chart::Chart;
use crate::data_types::DataView;

fn collect_views(chart: &Chart) -> Vec<&DataView> {
    chart
        .y1_axis()
        .views()
        .iter()
        .chain(chart.y2_axis().views())
        .collect()
}

/// Writes every view of the chart as tab-separated columns.
pub fn write_txt<W: Write>(chart: &Chart, out: &mut W) -> Result<()> {
    let views = collect_views(chart);
    if views.is_empty() {
        return Ok(());
    }

    let mut header = Vec::with_capacity(views.len() * 2);
    for v in &views {
        header.push("X".to_string());
        header.push(v.extended_name());
    }
    writeln!(out, "{}", header.join("\t")).wrap_err("writing header")?;

    let rows = views.iter().map(|v| v.len()).max().unwrap_or(0);
    let mut cells: Vec<String> = Vec::with_capacity(views.len() * 2);
    for row in 0..rows {
        cells.clear();
        for v in &views {
            match v.series().get(row) {
                Some(s) => {
                    cells.push(s.x.to_string());
                    cells.push(s.y.to_string());
                }
                None => {
                    cells.push(String::new());
                    cells.push(String::new());
                }
            }
        }
        writeln!(out, "{}", cells.join("\t")).wrap_err("writing sample row")?;
    }

    Ok(())
}

/// Writes the chart content to `path`, creating or truncating the file.
pub fn save_txt(chart: &Chart, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .wrap_err_with(|| format!("creating export file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_txt(chart, &mut out)?;
    out.flush().wrap_err("flushing export file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::YAxis;

    #[test]
    fn columns_align_by_index() {
        let mut chart = Chart::new();
        let mut v = DataView::new("Pressure");
        v.unit = "mbar".to_string();
        chart.y1_axis_mut().add_view(v);
        chart.add_data(YAxis::Y1, 0, 1.0, 10.0);
        chart.add_data(YAxis::Y1, 0, 2.0, 20.0);

        let mut buf = Vec::new();
        write_txt(&chart, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "X\tPressure (mbar)");
        assert_eq!(lines[1], "1\t10");
        assert_eq!(lines[2], "2\t20");
    }
}
