//! Resource links attached to user responses

use serde::Serialize;

/// A navigation link on a user resource
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    /// Relation of the link to the resource
    pub rel: &'static str,
    /// Target path
    pub href: String,
}

/// The link set for a user resource: `self`, `list`, `update`, `delete`
pub fn user_links(uni: &str) -> Vec<Link> {
    vec![
        Link {
            rel: "self",
            href: format!("/users/{uni}"),
        },
        Link {
            rel: "list",
            href: "/users/".to_string(),
        },
        Link {
            rel: "update",
            href: format!("/users/{uni}"),
        },
        Link {
            rel: "delete",
            href: format!("/users/{uni}"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_set_targets_the_resource() {
        let links = user_links("abc1234");
        let rels: Vec<&str> = links.iter().map(|l| l.rel).collect();
        assert_eq!(rels, ["self", "list", "update", "delete"]);
        assert!(links
            .iter()
            .filter(|l| l.rel != "list")
            .all(|l| l.href == "/users/abc1234"));
    }
}
