/// Indices of the `k` highest scores. Equal scores keep their input order,
/// so the earlier sentence wins a tie at the cut-off.
pub fn select_top_k(scores: &[f64], k: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked.truncate(k);
    ranked
}
