use super::model::SampleIdentity;

// ---------------------------------------------------------------------------
// Tag grouping: which plot groups a sample belongs to
// ---------------------------------------------------------------------------

/// The role of a tag a sample matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Wildtype,
    /// Position of the tag in the configured sample-tag list.
    Sample(usize),
}

/// One group a sample belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub tag: String,
    pub kind: TagKind,
}

/// Return every tag matched by `identity`, wildtype first, then sample tags in
/// list order.
///
/// A tag matches when any label contains it as a substring, so one sample can
/// land in several groups. Empty tags never match.
pub fn matching_tags(identity: &SampleIdentity, wildtype_tag: &str, sample_tags: &[String]) -> Vec<TagMatch> {
    let mut matches = Vec::new();
    if !wildtype_tag.is_empty() && identity.contains_tag(wildtype_tag) {
        matches.push(TagMatch {
            tag: wildtype_tag.to_string(),
            kind: TagKind::Wildtype,
        });
    }
    for (idx, tag) in sample_tags.iter().enumerate() {
        if !tag.is_empty() && identity.contains_tag(tag) {
            matches.push(TagMatch {
                tag: tag.clone(),
                kind: TagKind::Sample(idx),
            });
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(labels: &[&str]) -> SampleIdentity {
        SampleIdentity::new(labels.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_wildtype_and_sample_tags() {
        let tags = vec!["LHCX1g1".to_string(), "LHCX1g2".to_string()];
        let found = matching_tags(&id(&["WT1", "LHCX1g1"]), "WT", &tags);
        assert_eq!(
            found,
            vec![
                TagMatch { tag: "WT".into(), kind: TagKind::Wildtype },
                TagMatch { tag: "LHCX1g1".into(), kind: TagKind::Sample(0) },
            ]
        );
    }

    #[test]
    fn test_substring_matches_several_tags() {
        let tags = vec!["LHCX1".to_string(), "g2".to_string()];
        let found = matching_tags(&id(&["LHCX1g2_a"]), "WT", &tags);
        let kinds: Vec<_> = found.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![TagKind::Sample(0), TagKind::Sample(1)]);
    }

    #[test]
    fn test_no_match_and_empty_tags() {
        let tags = vec![String::new()];
        assert!(matching_tags(&id(&["X"]), "", &tags).is_empty());
    }
}
