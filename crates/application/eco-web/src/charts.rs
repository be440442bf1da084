//! Inline SVG charts
//!
//! Line charts for the weather trend, a pie for monthly composition and a
//! grouped bar chart comparing daily, monthly and yearly tons per source.

use eco_core::{PieShare, SourceBreakdown};
use std::f64::consts::PI;

use crate::templates::html_escape;

pub const PALETTE: [&str; 11] = [
    "#2e7d32", "#1565c0", "#f9a825", "#6a1b9a", "#c62828", "#00838f", "#ef6c00", "#4e342e",
    "#ad1457", "#558b2f", "#37474f",
];

const SERIES: [(&str, &str); 3] = [
    ("Daily", "#81c784"),
    ("Monthly", "#42a5f5"),
    ("Yearly", "#ef5350"),
];

const NO_DATA: &str = "<p class=\"muted\">No data to chart.</p>";

/// Line chart of labelled values, left to right
pub fn line_chart(title: &str, points: &[(String, f64)], unit: &str, color: &str) -> String {
    if points.is_empty() {
        return NO_DATA.to_string();
    }

    let (w, h, pad) = (640.0, 260.0, 44.0);
    let mut lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let mut hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let step = if points.len() > 1 {
        (w - 2.0 * pad) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| {
            let x = if points.len() > 1 { pad + step * i as f64 } else { w / 2.0 };
            let y = h - pad - (v - lo) / (hi - lo) * (h - 2.0 * pad);
            (x, y)
        })
        .collect();

    let polyline: Vec<String> = coords.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();

    let markers: String = coords
        .iter()
        .zip(points)
        .map(|((x, y), (label, v))| {
            format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"><title>{}: {} {}</title></circle>
                <text x=\"{:.1}\" y=\"{}\" class=\"axis-label\" text-anchor=\"middle\">{}</text>",
                x,
                y,
                color,
                html_escape(label),
                v,
                unit,
                x,
                h - pad + 18.0,
                html_escape(label)
            )
        })
        .collect();

    format!(
        "<figure class=\"chart\">
            <figcaption>{title}</figcaption>
            <svg viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">
                <line x1=\"{pad}\" y1=\"{base}\" x2=\"{right}\" y2=\"{base}\" class=\"axis\"/>
                <line x1=\"{pad}\" y1=\"{pad}\" x2=\"{pad}\" y2=\"{base}\" class=\"axis\"/>
                <text x=\"{lx}\" y=\"{pad}\" class=\"axis-label\" text-anchor=\"end\">{hi}</text>
                <text x=\"{lx}\" y=\"{base}\" class=\"axis-label\" text-anchor=\"end\">{lo}</text>
                <polyline points=\"{line}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>
                {markers}
            </svg>
        </figure>",
        title = html_escape(title),
        w = w,
        h = h,
        pad = pad,
        base = h - pad,
        right = w - pad,
        lx = pad - 6.0,
        hi = hi,
        lo = lo,
        line = polyline.join(" "),
        color = color,
        markers = markers
    )
}

/// Pie of each source's share of the monthly total
pub fn pie_chart(shares: &[PieShare]) -> String {
    if shares.is_empty() {
        return "<p class=\"muted\">No emissions to chart.</p>".to_string();
    }

    let (cx, cy, r) = (120.0, 120.0, 100.0);
    let slices: String = if shares.len() == 1 {
        format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"><title>{} {}</title></circle>",
            cx,
            cy,
            r,
            PALETTE[0],
            shares[0].source.name(),
            shares[0].label()
        )
    } else {
        let mut angle = -PI / 2.0;
        shares
            .iter()
            .enumerate()
            .map(|(i, share)| {
                let sweep = share.percent / 100.0 * 2.0 * PI;
                let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
                angle += sweep;
                let (x2, y2) = (cx + r * angle.cos(), cy + r * angle.sin());
                let large = if sweep > PI { 1 } else { 0 };
                format!(
                    "<path d=\"M{cx},{cy} L{x1:.2},{y1:.2} A{r},{r} 0 {large} 1 {x2:.2},{y2:.2} Z\" fill=\"{fill}\"><title>{name} {label}</title></path>",
                    cx = cx,
                    cy = cy,
                    r = r,
                    x1 = x1,
                    y1 = y1,
                    x2 = x2,
                    y2 = y2,
                    large = large,
                    fill = PALETTE[i % PALETTE.len()],
                    name = share.source.name(),
                    label = share.label()
                )
            })
            .collect()
    };

    let legend: String = shares
        .iter()
        .enumerate()
        .map(|(i, share)| {
            format!(
                "<li><span class=\"swatch\" style=\"background:{}\"></span>{} <strong>{}</strong></li>",
                PALETTE[i % PALETTE.len()],
                share.source.name(),
                share.label()
            )
        })
        .collect();

    format!(
        "<figure class=\"chart pie\">
            <svg viewBox=\"0 0 240 240\" xmlns=\"http://www.w3.org/2000/svg\">{}</svg>
            <ul class=\"legend\">{}</ul>
        </figure>",
        slices, legend
    )
}

/// Daily, monthly and yearly tons side by side for each source
pub fn grouped_bar_chart(rows: &[SourceBreakdown]) -> String {
    let max = rows
        .iter()
        .flat_map(|r| [r.daily_tons, r.monthly_tons, r.yearly_tons])
        .fold(0.0_f64, f64::max);
    if rows.is_empty() || max <= 0.0 {
        return NO_DATA.to_string();
    }

    let (w, h, pad, bottom) = (720.0, 320.0, 40.0, 80.0);
    let group = (w - 2.0 * pad) / rows.len() as f64;
    let bar = group / 4.0;
    let plot_h = h - pad - bottom;

    let bars: String = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let x0 = pad + group * i as f64 + bar / 2.0;
            let values = [row.daily_tons, row.monthly_tons, row.yearly_tons];
            let rects: String = values
                .iter()
                .zip(SERIES)
                .enumerate()
                .map(|(j, (v, (series, fill)))| {
                    let bh = v.max(0.0) / max * plot_h;
                    format!(
                        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{} {}: {} t</title></rect>",
                        x0 + bar * j as f64,
                        h - bottom - bh,
                        bar,
                        bh,
                        fill,
                        row.source.name(),
                        series,
                        v
                    )
                })
                .collect();
            let lx = x0 + bar * 1.5;
            let ly = h - bottom + 14.0;
            format!(
                "{}<text x=\"{:.1}\" y=\"{:.1}\" class=\"axis-label\" text-anchor=\"end\" transform=\"rotate(-45 {:.1} {:.1})\">{}</text>",
                rects,
                lx,
                ly,
                lx,
                ly,
                row.source.name()
            )
        })
        .collect();

    let legend: String = SERIES
        .iter()
        .map(|(name, fill)| {
            format!(
                "<li><span class=\"swatch\" style=\"background:{}\"></span>{} (tons)</li>",
                fill, name
            )
        })
        .collect();

    format!(
        "<figure class=\"chart\">
            <figcaption>Emission Comparison by Source</figcaption>
            <svg viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">
                <line x1=\"{pad}\" y1=\"{base}\" x2=\"{right}\" y2=\"{base}\" class=\"axis\"/>
                <text x=\"{lx}\" y=\"{pad}\" class=\"axis-label\" text-anchor=\"end\">{max}</text>
                {bars}
            </svg>
            <ul class=\"legend\">{legend}</ul>
        </figure>",
        w = w,
        h = h,
        pad = pad,
        base = h - bottom,
        right = w - pad,
        lx = pad - 6.0,
        max = max,
        bars = bars,
        legend = legend
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::{ActivityUsage, EmissionEstimator};

    fn trend() -> Vec<(String, f64)> {
        vec![
            ("2025-06-01".into(), 30.0),
            ("2025-06-02".into(), 29.5),
            ("2025-06-03".into(), 28.0),
        ]
    }

    #[test]
    fn test_line_chart_points() {
        let svg = line_chart("Dhaka Temperature Trend", &trend(), "°C", "#e53935");
        assert!(svg.contains("Dhaka Temperature Trend"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("2025-06-02: 29.5 °C"));
    }

    #[test]
    fn test_line_chart_flat_and_single() {
        let flat = vec![("a".to_string(), 5.0), ("b".to_string(), 5.0)];
        assert!(!line_chart("t", &flat, "", "#000").contains("NaN"));
        let single = vec![("a".to_string(), 5.0)];
        assert!(!line_chart("t", &single, "", "#000").contains("NaN"));
        assert_eq!(line_chart("t", &[], "", "#000"), NO_DATA);
    }

    #[test]
    fn test_pie_from_breakdown() {
        let table = EmissionEstimator::default().breakdown_table(&ActivityUsage::dashboard_defaults());
        let shares = table.pie_shares();
        let svg = pie_chart(&shares);
        assert_eq!(svg.matches("<path").count(), shares.len());
        assert!(svg.contains("Electricity"));
    }

    #[test]
    fn test_pie_empty_and_single() {
        assert!(!pie_chart(&[]).contains("<svg"));

        let table = EmissionEstimator::default()
            .breakdown_table(&ActivityUsage::zero().with(eco_core::Activity::Lpg, 10.0));
        let svg = pie_chart(&table.pie_shares());
        assert!(svg.contains("<circle"));
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn test_bar_chart_three_bars_per_source() {
        let table = EmissionEstimator::default().breakdown_table(&ActivityUsage::dashboard_defaults());
        let svg = grouped_bar_chart(&table.rows);
        assert_eq!(svg.matches("<rect").count(), table.rows.len() * 3);
    }

    #[test]
    fn test_bar_chart_all_zero() {
        let table = EmissionEstimator::default().breakdown_table(&ActivityUsage::zero());
        assert_eq!(grouped_bar_chart(&table.rows), NO_DATA);
    }
}
