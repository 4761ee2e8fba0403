use std::future::Future;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '_' || c == '-'
}

/// Lower-cases `title`, drops anything but ASCII letters, digits, `_`, `-` and
/// whitespace, then joins the remaining words with single hyphens.
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || is_separator(*c))
    {
        if is_separator(c) {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }

    slug
}

/// Probes `exists` with the normalized title, then `-1`, `-2`, ... until a
/// free candidate is found. An empty base yields `"-1"` on the first collision.
pub async fn unique_slug<F, Fut, E>(title: &str, mut exists: F) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let base = normalize(title);
    let mut candidate = base.clone();
    let mut counter: u32 = 1;

    while exists(candidate.clone()).await? {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::convert::Infallible;

    #[rstest]
    #[case("Honda Civic", "honda-civic")]
    #[case("  Toyota Corolla XEi 2.0 Automático ", "toyota-corolla-xei-20-automtico")]
    #[case("VW -- Jetta__TSI", "vw-jetta-tsi")]
    #[case("--Fiat   Uno--", "fiat-uno")]
    #[case("R$ 95.000!!", "r-95000")]
    #[case("Híbrido", "hbrido")]
    #[case("!!!", "")]
    #[case("", "")]
    fn normalizes_titles(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(normalize(title), expected);
    }

    #[rstest]
    #[case("Honda Civic 2.0 EXL CVT")]
    #[case(" -_ Mixed_Case  Title -_ ")]
    #[case("Ação & Reação 2024")]
    #[case("tab\tand\nnewline")]
    fn normalize_is_idempotent(#[case] title: &str) {
        let once = normalize(title);
        assert_eq!(normalize(&once), once);
    }

    #[tokio::test]
    async fn first_free_candidate_is_returned() {
        let slug = unique_slug("Honda Civic", |candidate| async move {
            Ok::<_, Infallible>(candidate == "honda-civic")
        })
        .await
        .unwrap();
        assert_eq!(slug, "honda-civic-1");
    }

    #[tokio::test]
    async fn counter_keeps_incrementing() {
        let taken = ["jetta", "jetta-1", "jetta-2"];
        let slug = unique_slug("Jetta", |candidate| async move {
            Ok::<_, Infallible>(taken.contains(&candidate.as_str()))
        })
        .await
        .unwrap();
        assert_eq!(slug, "jetta-3");
    }

    #[tokio::test]
    async fn empty_base_collides_into_bare_suffix() {
        let slug = unique_slug("???", |candidate| async move {
            Ok::<_, Infallible>(candidate.is_empty())
        })
        .await
        .unwrap();
        assert_eq!(slug, "-1");
    }

    #[tokio::test]
    async fn probe_errors_propagate() {
        let result = unique_slug("Civic", |_| async { Err::<bool, _>("db down") }).await;
        assert_eq!(result, Err("db down"));
    }
}
