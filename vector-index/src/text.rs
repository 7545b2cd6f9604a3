//! Builds the text embedded for one symbol (§4.I): `name + signature +
//! docstring + first_body_lines(<= N)`.

const MAX_BODY_LINES: usize = 20;

pub struct EmbeddingInput<'a> {
    pub name: &'a str,
    pub signature: &'a str,
    pub docstring: Option<&'a str>,
    pub body: &'a str,
}

pub fn embedding_text(input: &EmbeddingInput) -> String {
    let mut parts = vec![input.name.to_string(), input.signature.to_string()];
    if let Some(doc) = input.docstring {
        parts.push(doc.to_string());
    }
    let body_head: String = input.body.lines().take(MAX_BODY_LINES).collect::<Vec<_>>().join("\n");
    parts.push(body_head);
    parts.join("\n")
}

/// Scales `v` to unit length. A zero vector is returned unchanged rather
/// than producing `NaN`.
pub fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_body_to_max_lines() {
        let body = (0..100).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let input = EmbeddingInput { name: "f", signature: "f()", docstring: None, body: &body };
        let text = embedding_text(&input);
        assert_eq!(text.lines().count(), 2 + MAX_BODY_LINES);
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let v = normalize(vec![3.0, 4.0]);
        let norm = (v[0] * v[0] + v[1] * v[1]).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_normalizes_to_itself() {
        assert_eq!(normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }
}
