use crate::core::view::FormView;
use crate::utils::error::Result;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(view: &FormView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => render_json(view),
    }
}

pub fn render_json(view: &FormView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// 純文字版畫面：輸入欄位、錯誤訊息、送出狀態與結果
pub fn render_text(view: &FormView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Please enter URLs to get meta data:");
    for slot in &view.slots {
        let value = if slot.value.is_empty() {
            format!("<{}>", slot.placeholder)
        } else {
            slot.value.clone()
        };
        let marker = if slot.removable { "  [removable]" } else { "" };
        let _ = writeln!(out, "  {:>2}. {}{}", slot.position + 1, value, marker);
    }

    if let Some(error) = &view.validation_error {
        let _ = writeln!(out, "{}", error);
    }
    let _ = writeln!(out, "[{}]", view.submit_label);

    if view.results.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Fetched Metadata:");
    if let Some(at) = view.settled_at {
        let _ = writeln!(out, "(settled at {})", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    for item in &view.results {
        let _ = writeln!(out);
        match item.failure_message() {
            Some(message) => {
                let _ = writeln!(out, "Error fetching data for: {}", item.address());
                let _ = writeln!(out, "  {}", message);
            }
            None => {
                let _ = writeln!(out, "{}", item.title());
                if let Some(image) = item.image() {
                    let _ = writeln!(out, "  image: {}", image);
                }
                if !item.description().is_empty() {
                    let _ = writeln!(out, "  {}", item.description());
                }
                let _ = writeln!(out, "  {}", item.address());
            }
        }
    }

    out
}
