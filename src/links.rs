//! Download link generation.
//!
//! Link building belongs to the sharing service; the component only sees the
//! [`LinkGenerator`] trait. [`QueryLinkGenerator`] is the default used by the
//! binary.

use crate::files::FileEntry;

/// A generated link for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Display name of the file.
    pub name: String,
    /// Download URL.
    pub url: String,
}

/// Builds download URLs for files of a shared bundle.
pub trait LinkGenerator: std::fmt::Debug {
    /// Build the download URL for a single file.
    fn download_link(&self, api_base: &str, xtlink: &str, key: &str, password: &str) -> String;

    /// Build one link per file, in list order.
    fn download_links(
        &self,
        api_base: &str,
        xtlink: &str,
        files: &[FileEntry],
        password: &str,
    ) -> Vec<DownloadLink> {
        files
            .iter()
            .map(|file| DownloadLink {
                name: file.name.clone(),
                url: self.download_link(api_base, xtlink, &file.key, password),
            })
            .collect()
    }
}

/// `<base>/download?xtlink=..&key=..[&password=..]`
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryLinkGenerator;

impl LinkGenerator for QueryLinkGenerator {
    fn download_link(&self, api_base: &str, xtlink: &str, key: &str, password: &str) -> String {
        let mut url = format!(
            "{}/download?xtlink={}&key={}",
            api_base.trim_end_matches('/'),
            urlencoding::encode(xtlink),
            urlencoding::encode(key),
        );
        if !password.is_empty() {
            url.push_str("&password=");
            url.push_str(&urlencoding::encode(password));
        }
        url
    }
}

/// Join links as `name: url` pairs separated by a blank line.
pub fn format_links_text(links: &[DownloadLink]) -> String {
    links
        .iter()
        .map(|link| format!("{}: {}", link.name, link.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_components_and_trims_base() {
        let url = QueryLinkGenerator.download_link(
            "https://api.example.com/",
            "tok en",
            "dir/a&b.txt",
            "p@ss",
        );
        assert_eq!(
            url,
            "https://api.example.com/download?xtlink=tok%20en&key=dir%2Fa%26b.txt&password=p%40ss"
        );
    }

    #[test]
    fn empty_password_is_omitted() {
        let url = QueryLinkGenerator.download_link("http://h", "x", "k", "");
        assert_eq!(url, "http://h/download?xtlink=x&key=k");
    }

    #[test]
    fn multiple_links_follow_list_order() {
        let files = vec![FileEntry::new("z", "Zed"), FileEntry::new("a", "Ay")];
        let links = QueryLinkGenerator.download_links("http://h", "x", &files, "");
        let names: Vec<_> = links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Zed", "Ay"]);
        assert!(links[0].url.ends_with("key=z"));
    }

    #[test]
    fn links_text_uses_blank_line_separator() {
        let links = vec![
            DownloadLink {
                name: "one.txt".into(),
                url: "http://h/1".into(),
            },
            DownloadLink {
                name: "two.txt".into(),
                url: "http://h/2".into(),
            },
        ];
        assert_eq!(
            format_links_text(&links),
            "one.txt: http://h/1\n\ntwo.txt: http://h/2"
        );
        assert_eq!(format_links_text(&[]), "");
    }
}
