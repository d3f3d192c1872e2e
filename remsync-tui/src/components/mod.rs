use ratatui::layout::{Constraint, Layout, Rect};

pub mod add_remote;
pub mod branch_info;
pub mod branch_picker;
pub mod commit_list;
pub mod confirm;
pub mod dialog;
pub mod footer;
pub mod header;
pub mod help;
pub mod status_bar;

/// Helper function to center a rect within another rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Percentage(percent_y.min(100)),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(percent_x.min(100)),
        Constraint::Fill(1),
    ])
    .split(popup_layout[1])[1]
}

/// Center a `width` x `height` rect in `r`, shrinking it to fit
pub fn centered_fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Dialogs take 80% of the terminal width
pub fn dialog_width(terminal_width: u16) -> u16 {
    let width = u32::from(terminal_width) * 4 / 5;
    u16::try_from(width).unwrap_or(terminal_width).max(1)
}
