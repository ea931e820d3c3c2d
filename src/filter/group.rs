use serde::Serialize;
use std::collections::HashMap;

/// Records sharing one classification tag
#[derive(Debug, Clone, Serialize)]
pub struct Group<T> {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub items: Vec<T>,
}

/// Group records by tag. Groups appear in the order their tag was first seen;
/// records keep their input order within a group.
pub fn group_by<T, F>(items: &[T], key: F) -> Vec<Group<T>>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<T>> = Vec::new();

    for item in items {
        let tag = key(item);
        let slot = match index.get(tag) {
            Some(&slot) => slot,
            None => {
                index.insert(tag.to_string(), groups.len());
                groups.push(Group {
                    key: tag.to_string(),
                    label: humanize(tag),
                    count: 0,
                    items: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].count += 1;
        groups[slot].items.push(item.clone());
    }

    groups
}

/// `temperature-log` → `Temperature Log`
pub fn humanize(tag: &str) -> String {
    tag.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Doc {
        kind: &'static str,
    }

    #[test]
    fn groups_in_first_seen_order() {
        let docs = [
            Doc { kind: "temperature-log" },
            Doc { kind: "temperature-log" },
            Doc { kind: "training-certificate" },
        ];

        let groups = group_by(&docs, |d| d.kind);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Temperature Log");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].label, "Training Certificate");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn later_tags_do_not_reorder_groups() {
        let docs = [Doc { kind: "b" }, Doc { kind: "a" }, Doc { kind: "b" }];
        let keys: Vec<_> = group_by(&docs, |d| d.kind).into_iter().map(|g| g.key).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn humanizes_tags() {
        assert_eq!(humanize("pest_control"), "Pest Control");
        assert_eq!(humanize("haccp"), "Haccp");
        assert_eq!(humanize(""), "");
    }
}
