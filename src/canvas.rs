// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Canvas Renderer

//! Draws the presentation model onto 2d canvases. Stateless: every call
//! repaints the whole canvas from the model it is given.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::chart::{Axis, ChartModel, ChartPoint, GaugeTone, ReserveGauge};

const BG_COLOR: &str = "#0f172a";
const GRID_COLOR: &str = "rgba(148, 163, 184, 0.15)";
const RESERVE_COLOR: &str = "#7aa2ff";
const CONSUMPTION_COLOR: &str = "#fbbf24";
const MIDNIGHT_COLOR: &str = "rgba(232, 121, 249, 0.45)";
const TEXT_COLOR: &str = "rgba(232, 236, 255, 0.85)";

const PAD_LEFT: f64 = 44.0;
const PAD_RIGHT: f64 = 44.0;
const PAD_TOP: f64 = 16.0;
const PAD_BOTTOM: f64 = 28.0;

/// Minutes between x-axis labels.
const LABEL_EVERY: u64 = 360;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "get_context failed")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "cast failed".to_string())
}

/// Draw both series, their axes and the midnight markers.
pub fn draw_chart(canvas: &HtmlCanvasElement, chart: &ChartModel) -> Result<(), String> {
    let ctx = context_2d(canvas)?;
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;

    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);

    let plot_w = (w - PAD_LEFT - PAD_RIGHT).max(1.0);
    let plot_h = (h - PAD_TOP - PAD_BOTTOM).max(1.0);

    // Horizontal grid at quarters of both axes.
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0);
    ctx.set_font("10px system-ui, sans-serif");
    for q in 0..=4 {
        let frac = q as f64 / 4.0;
        let y = PAD_TOP + plot_h * (1.0 - frac);
        ctx.begin_path();
        ctx.move_to(PAD_LEFT, y);
        ctx.line_to(PAD_LEFT + plot_w, y);
        ctx.stroke();

        let reserve_tick = chart.reserve_axis.min + frac * (chart.reserve_axis.max - chart.reserve_axis.min);
        let consumption_tick =
            chart.consumption_axis.min + frac * (chart.consumption_axis.max - chart.consumption_axis.min);
        ctx.set_fill_style_str(RESERVE_COLOR);
        ctx.set_text_align("right");
        let _ = ctx.fill_text(&format!("{:.0}", reserve_tick), PAD_LEFT - 6.0, y + 3.0);
        ctx.set_fill_style_str(CONSUMPTION_COLOR);
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("{:.2}", consumption_tick), PAD_LEFT + plot_w + 6.0, y + 3.0);
    }

    let Some((x_min, x_max)) = chart.x_range() else {
        return Ok(());
    };
    let span = (x_max - x_min).max(1) as f64;
    let px = |x: u64| PAD_LEFT + plot_w * ((x - x_min) as f64 / span);

    // Midnight markers.
    ctx.set_stroke_style_str(MIDNIGHT_COLOR);
    ctx.set_fill_style_str(MIDNIGHT_COLOR);
    ctx.set_text_align("left");
    for marker in &chart.midnights {
        let x = px(marker.x);
        ctx.begin_path();
        ctx.move_to(x, PAD_TOP);
        ctx.line_to(x, PAD_TOP + plot_h);
        ctx.stroke();
        let _ = ctx.fill_text(&marker.label, x + 3.0, PAD_TOP + 10.0);
    }

    // Clock labels.
    ctx.set_fill_style_str(TEXT_COLOR);
    ctx.set_text_align("center");
    for point in chart.points.iter().filter(|p| p.x % LABEL_EVERY == 0) {
        let _ = ctx.fill_text(&point.label, px(point.x), h - 10.0);
    }

    // Series.
    let series: [(&str, fn(&ChartPoint) -> f64, Axis); 2] = [
        (RESERVE_COLOR, |p| p.reserve_percent, chart.reserve_axis),
        (CONSUMPTION_COLOR, |p| p.consumption, chart.consumption_axis),
    ];
    for (color, value, axis) in series {
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(1.5);
        ctx.begin_path();
        for (i, point) in chart.points.iter().enumerate() {
            let x = px(point.x);
            let y = PAD_TOP + plot_h * (1.0 - axis.normalize(value(point)));
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();
    }

    Ok(())
}

/// Horizontal progress bar for the current reserve.
pub fn draw_reserve_bar(canvas: &HtmlCanvasElement, gauge: &ReserveGauge) -> Result<(), String> {
    let ctx = context_2d(canvas)?;
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;

    ctx.set_fill_style_str(BG_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str("rgba(122, 162, 255, 0.15)");
    ctx.fill_rect(0.0, 0.0, w, h);

    let fill = match gauge.tone {
        GaugeTone::Healthy => "#4ade80",
        GaugeTone::Low => "#fbbf24",
        GaugeTone::Exhausted => "#fb7185",
    };
    let frac = (gauge.percent / 100.0).clamp(0.0, 1.0);
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(0.0, 0.0, w * frac, h);

    ctx.set_fill_style_str(TEXT_COLOR);
    ctx.set_font("bold 12px system-ui, sans-serif");
    ctx.set_text_align("center");
    let _ = ctx.fill_text(&gauge.text, w / 2.0, h / 2.0 + 4.0);

    Ok(())
}
