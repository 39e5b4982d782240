use crate::models::SentenceRect;

/// Index of the rect whose vertical center is closest to `y`.
///
/// Returns `None` only when there are no rects. Ties resolve to the earlier
/// sentence.
pub fn map_nearest_center(rects: &[SentenceRect], y: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for rect in rects {
        let dy = (y - rect.center_y()).abs();
        match best {
            Some((_, best_dy)) if dy >= best_dy => {}
            _ => best = Some((rect.index, dy)),
        }
    }

    best.map(|(index, _)| index)
}

/// Index of the first rect vertically containing the viewport `y`, after
/// shifting it into document space by `scroll_y`.
pub fn map_contained(rects: &[SentenceRect], y: f64, scroll_y: f64) -> Option<usize> {
    let doc_y = y + scroll_y;
    rects
        .iter()
        .find(|rect| rect.contains_y(doc_y))
        .map(|rect| rect.index)
}
