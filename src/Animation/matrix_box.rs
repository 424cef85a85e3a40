//! Text-only matrices and bullet lists.
use super::primitives::{Color, Group, LineSegment, Mobject, Point3, Shape, TextItem};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBoxStyle {
    pub font_size: f64,
    /// horizontal gap between cells
    pub h_pad: f64,
    /// vertical gap between rows
    pub v_pad: f64,
    pub bracket_scale: f64,
    pub color: Color,
}

impl Default for MatrixBoxStyle {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            h_pad: 0.25,
            v_pad: 0.25,
            bracket_scale: 1.0,
            color: Color::WHITE,
        }
    }
}

impl MatrixBoxStyle {
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn brace_pad(&self) -> f64 {
        0.15 * self.bracket_scale
    }

    pub fn cap(&self) -> f64 {
        0.25 * self.bracket_scale
    }
}

/// A grid of cell labels between two square brackets
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBox {
    /// one group per row, every row has the same number of cells
    pub grid: Group,
    pub left_bracket: Group,
    pub right_bracket: Group,
}

impl MatrixBox {
    pub fn rows(&self) -> &[Mobject] {
        &self.grid.children
    }
}

impl From<MatrixBox> for Mobject {
    fn from(m: MatrixBox) -> Mobject {
        Mobject::from(Group::new(vec![
            Mobject::from(m.grid),
            Mobject::from(m.left_bracket),
            Mobject::from(m.right_bracket),
        ]))
    }
}

fn bracket(x: f64, top: f64, bottom: f64, cap: f64, color: Color) -> Group {
    let seg = |a: Point3, b: Point3| Mobject::from(LineSegment::new(a, b).with_color(color));
    Group::new(vec![
        seg(Point3::new(x, top, 0.0), Point3::new(x, bottom, 0.0)),
        seg(Point3::new(x, top, 0.0), Point3::new(x + cap, top, 0.0)),
        seg(Point3::new(x, bottom, 0.0), Point3::new(x + cap, bottom, 0.0)),
    ])
}

/// Lays out `values` as rows of text cells and frames them with brackets.
///
/// Short rows are padded with empty cells so every row has as many items as the widest one.
/// Cells run left to right `h_pad` apart, rows run downwards `v_pad` apart with their left
/// edges on the first row's left edge. The brackets span the grid top to bottom and sit
/// `brace_pad` outside its left and right edges, caps of length `cap` pointing inwards.
pub fn make_matrix_box<T: Display>(values: &[Vec<T>], style: &MatrixBoxStyle) -> MatrixBox {
    let max_cols = values.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut rows: Vec<Mobject> = Vec::with_capacity(values.len());
    for row in values {
        let mut cells: Vec<Mobject> = Vec::with_capacity(max_cols);
        for i in 0..max_cols {
            let text = row.get(i).map(|v| v.to_string()).unwrap_or_default();
            let mut cell = Mobject::from(TextItem::new(&text, style.font_size).with_color(style.color));
            if let Some(prev) = cells.last() {
                cell = cell.next_to(prev, Point3::RIGHT, style.h_pad);
            }
            cells.push(cell);
        }
        let mut row_group = Mobject::from(Group::new(cells));
        if let Some(prev) = rows.last() {
            row_group = row_group.next_to_aligned(prev, Point3::DOWN, style.v_pad, Point3::LEFT);
        }
        rows.push(row_group);
    }
    let grid = Group::new(rows);
    let b = Mobject::from(grid.clone()).extent();
    let pad = style.brace_pad();
    let cap = style.cap();
    MatrixBox {
        left_bracket: bracket(b.left() - pad, b.top(), b.bottom(), cap, style.color),
        right_bracket: bracket(b.right() + pad, b.top(), b.bottom(), -cap, style.color),
        grid,
    }
}

/// `"• item"` lines stacked downwards with aligned left edges
pub fn make_bullets(lines: &[&str], font_size: f64, line_spacing: f64, bullet: &str) -> Group {
    let mut items: Vec<Mobject> = Vec::with_capacity(lines.len());
    for line in lines {
        let mut item = Mobject::from(TextItem::new(&format!("{} {}", bullet, line), font_size));
        if let Some(prev) = items.last() {
            item = item.next_to_aligned(prev, Point3::DOWN, line_spacing, Point3::LEFT);
        }
        items.push(item);
    }
    Group::new(items)
}

/// bullets with the default look: font 24, spacing 0.25, `•`
pub fn make_default_bullets(lines: &[&str]) -> Group {
    make_bullets(lines, 24.0, 0.25, "•")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn brackets_caps_point_inwards() {
        let m = make_matrix_box(&[vec![1, 2]], &MatrixBoxStyle::default());
        let left = Mobject::from(m.left_bracket.clone()).extent();
        let right = Mobject::from(m.right_bracket.clone()).extent();
        let grid = Mobject::from(m.grid.clone()).extent();
        assert_relative_eq!(left.width(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(right.width(), 0.25, epsilon = 1e-12);
        assert!(left.left() < grid.left());
        assert!(right.right() > grid.right());
    }

    #[test]
    fn empty_matrix_has_no_rows() {
        let m = make_matrix_box::<i32>(&[], &MatrixBoxStyle::default());
        assert!(m.rows().is_empty());
        assert!(m.grid.bounds().is_none());
    }
}
