use std::collections::HashMap;

use iocraft::prelude::*;

use crate::color::{Color as AppColor, ColorDepth};
use crate::config::keybindings::{BuiltinAction, Keybinding, MergedBindings, ViewContext};

// ---------------------------------------------------------------------------
// Help overlay
// ---------------------------------------------------------------------------

pub struct RenderedHelpOverlay {
    pub groups: Vec<RenderedHelpGroup>,
    pub title_fg: Color,
    pub key_fg: Color,
    pub desc_fg: Color,
    pub border_fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHelpGroup {
    pub title: String,
    pub rows: Vec<RenderedHelpRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHelpRow {
    pub key: String,
    pub description: String,
}

pub struct HelpOverlayBuildConfig<'a> {
    pub bindings: &'a MergedBindings,
    pub context: ViewContext,
    pub depth: ColorDepth,
    pub title_color: Option<AppColor>,
    pub key_color: Option<AppColor>,
    pub desc_color: Option<AppColor>,
    pub border_color: Option<AppColor>,
    pub bg_color: Option<AppColor>,
}

impl RenderedHelpOverlay {
    pub fn build(cfg: &HelpOverlayBuildConfig<'_>) -> Self {
        let fg = |c: Option<AppColor>, fallback: Color| {
            c.map_or(fallback, |c| c.to_crossterm_color(cfg.depth))
        };
        Self {
            groups: build_help_groups(cfg.bindings, cfg.context),
            title_fg: fg(cfg.title_color, Color::White),
            key_fg: fg(cfg.key_color, Color::Cyan),
            desc_fg: fg(cfg.desc_color, Color::Grey),
            border_fg: fg(cfg.border_color, Color::DarkGrey),
            bg: fg(cfg.bg_color, Color::Black),
        }
    }
}

/// One group per binding section; keys sharing a description are combined
/// into a single row such as `j / ↓`.
pub fn build_help_groups(
    bindings: &MergedBindings,
    context: ViewContext,
) -> Vec<RenderedHelpGroup> {
    let mut groups = Vec::new();

    for (label, keybindings) in bindings.all_for_context(context) {
        let mut rows: Vec<RenderedHelpRow> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for kb in keybindings {
            let desc = description_for_keybinding(kb);
            if let Some(&idx) = seen.get(&desc) {
                rows[idx].key = format!("{} / {}", rows[idx].key, format_key_display(&kb.key));
            } else {
                seen.insert(desc.clone(), rows.len());
                rows.push(RenderedHelpRow {
                    key: format_key_display(&kb.key),
                    description: desc,
                });
            }
        }

        if !rows.is_empty() {
            groups.push(RenderedHelpGroup {
                title: label.to_owned(),
                rows,
            });
        }
    }

    groups
}

/// Key names as shown to the user.
pub fn format_key_display(key: &str) -> String {
    match key {
        "space" => "Space".to_owned(),
        "enter" => "Enter".to_owned(),
        "esc" => "Esc".to_owned(),
        "backspace" => "Backspace".to_owned(),
        "pageup" => "PgUp".to_owned(),
        "pagedown" => "PgDn".to_owned(),
        "up" => "\u{2191}".to_owned(),
        "down" => "\u{2193}".to_owned(),
        "left" => "\u{2190}".to_owned(),
        "right" => "\u{2192}".to_owned(),
        "home" => "Home".to_owned(),
        "end" => "End".to_owned(),
        "tab" => "Tab".to_owned(),
        "backtab" => "S-Tab".to_owned(),
        s if s.starts_with("ctrl+") => format!("Ctrl+{}", &s[5..]),
        s if s.starts_with("alt+") => format!("Alt+{}", &s[4..]),
        s => s.to_owned(),
    }
}

fn description_for_keybinding(kb: &Keybinding) -> String {
    if let Some(name) = &kb.name {
        return name.clone();
    }
    BuiltinAction::from_name(&kb.builtin)
        .map_or_else(|| "(unbound)".to_owned(), |a| a.description().to_owned())
}

// ---------------------------------------------------------------------------
// HelpOverlay component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct HelpOverlayProps {
    pub overlay: Option<RenderedHelpOverlay>,
    pub width: u16,
    pub height: u16,
}

#[component]
pub fn HelpOverlay(props: &mut HelpOverlayProps) -> impl Into<AnyElement<'static>> {
    let Some(overlay) = props.overlay.take() else {
        return element! { View }.into_any();
    };

    let width = u32::from(props.width);
    let height = u32::from(props.height);

    let overlay_width = (width * 3 / 5).max(40).min(width.saturating_sub(4));
    let overlay_height = (height * 4 / 5).max(10).min(height.saturating_sub(2));
    let pad_left = (width.saturating_sub(overlay_width)) / 2;
    let pad_top = (height.saturating_sub(overlay_height)) / 2;

    let mut lines: Vec<(String, Color, Weight)> = vec![
        ("Keybindings".to_owned(), overlay.title_fg, Weight::Bold),
        (String::new(), overlay.desc_fg, Weight::Normal),
    ];
    for group in &overlay.groups {
        lines.push((format!("  {}", group.title), overlay.title_fg, Weight::Bold));
        for row in &group.rows {
            lines.push((
                format!("    {:>14}  {}", row.key, row.description),
                overlay.desc_fg,
                Weight::Normal,
            ));
        }
        lines.push((String::new(), overlay.desc_fg, Weight::Normal));
    }
    lines.push(("  Press ? to close".to_owned(), overlay.key_fg, Weight::Normal));
    lines.truncate(overlay_height.saturating_sub(2) as usize);

    element! {
        View(width, height, position: Position::Absolute) {
            View(
                margin_left: pad_left,
                margin_top: pad_top,
                width: overlay_width,
                height: overlay_height,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Double,
                border_color: overlay.border_fg,
                background_color: overlay.bg,
                padding_left: 1,
                padding_right: 1,
                overflow: Overflow::Hidden,
            ) {
                #(lines.into_iter().map(|(text, color, weight)| {
                    element! {
                        Text(content: text, color, weight, wrap: TextWrap::NoWrap)
                    }
                }))
            }
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;

    #[test]
    fn keys_with_same_action_are_combined() {
        let merged = MergedBindings::from_config(&KeybindingsConfig::default());
        let groups = build_help_groups(&merged, ViewContext::Conversations);
        let universal = groups
            .iter()
            .find(|g| g.title == "Universal")
            .expect("universal group");
        assert!(universal.rows.iter().any(|r| r.key == "j / \u{2193}"));
    }

    #[test]
    fn context_group_comes_with_universal() {
        let merged = MergedBindings::from_config(&KeybindingsConfig::default());
        let groups = build_help_groups(&merged, ViewContext::Drawer);
        assert!(groups.len() >= 2);
    }

    #[test]
    fn special_keys_are_prettified() {
        assert_eq!(format_key_display("ctrl+d"), "Ctrl+d");
        assert_eq!(format_key_display("space"), "Space");
        assert_eq!(format_key_display("x"), "x");
    }
}
