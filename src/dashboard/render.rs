use crate::models::bar::PriceSeries;
use crate::models::gain::QueryResult;
use crate::services::index_service::IndexSummary;
use std::fmt::Write;

pub fn render_index_panel(summaries: &[IndexSummary]) -> String {
    let mut out = String::from("📊 유럽 주요 지수 현황\n");
    if summaries.is_empty() {
        out.push_str("  (지수 데이터 없음)\n");
        return out;
    }
    for summary in summaries {
        let _ = writeln!(
            out,
            "  {:<24} {:>12.2} {:>+8.2}%",
            summary.name, summary.last, summary.change_pct
        );
    }
    out
}

pub fn render_gainer_table(result: &QueryResult) -> String {
    let mut out = String::new();

    if !result.has_results() {
        out.push_str("📉 유럽 시장이 폐장했거나 조건에 맞는 종목이 없습니다.\n");
        if !result.message.is_empty() {
            let _ = writeln!(out, "  {}", result.message);
        }
        return out;
    }

    let _ = writeln!(out, "🟢 장중! 급등 종목 발견! ({})", result.message);
    let _ = writeln!(
        out,
        "  {:<20} {:<14} {:<10} {:>10} {:>10} {:>9}",
        "시간", "기업명", "티커", "당일시가", "현재가", "상승률(%)"
    );
    for record in &result.results {
        let _ = writeln!(
            out,
            "  {:<20} {:<14} {:<10} {:>10.2} {:>10.2} {:>9.2}",
            record.timestamp, record.name, record.symbol,
            record.opening_price, record.latest_price, record.gain_pct
        );
    }
    out
}

/// Plot intraday closes as an ASCII line chart of `height` rows by at most
/// `width` columns.
pub fn render_line_chart(series: &PriceSeries, width: usize, height: usize) -> String {
    let mut out = format!("📈 {} 종목 차트\n", series.symbol);
    let closes = series.closes();
    if closes.is_empty() || width == 0 || height == 0 {
        out.push_str("  📉 차트 데이터를 불러올 수 없습니다.\n");
        return out;
    }

    let columns = downsample(&closes, width);
    let min = columns.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = columns.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let row_of = |value: f64| -> usize {
        if span <= 0.0 || height == 1 {
            return height / 2;
        }
        let scaled = (value - min) / span * (height - 1) as f64;
        (height - 1) - scaled.round() as usize
    };

    let mut grid = vec![vec![' '; columns.len()]; height];
    for (x, &value) in columns.iter().enumerate() {
        grid[row_of(value)][x] = '•';
    }

    for (y, row) in grid.iter().enumerate() {
        let label = if y == 0 {
            format!("{:>10.2}", max)
        } else if y == height - 1 {
            format!("{:>10.2}", min)
        } else {
            " ".repeat(10)
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{} │{}", label, line.trim_end());
    }
    let _ = writeln!(out, "{} └{}", " ".repeat(10), "─".repeat(columns.len()));
    out
}

// Last value of each bucket, so the final column is always the latest close
fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }
    (1..=width)
        .map(|i| values[i * values.len() / width - 1])
        .collect()
}
