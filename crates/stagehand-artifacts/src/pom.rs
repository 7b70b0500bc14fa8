//! Add missing publication metadata to POM files.
//!
//! Central requires `<url>`, `<licenses>`, `<scm>` and `<developers>` on every
//! POM. When one of those top-level elements is absent and a default was
//! configured, the block is inserted just before `</project>`. Everything
//! else in the document is kept byte-for-byte.

use std::collections::BTreeSet;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use stagehand_core::settings::PomDefaults;
use stagehand_util::errors::StagehandError;

/// Patches POM documents with configured defaults.
#[derive(Debug, Clone, Default)]
pub struct PomPatcher {
    defaults: PomDefaults,
}

impl PomPatcher {
    /// Fails if only one of the license name and URL is set.
    pub fn new(defaults: PomDefaults) -> miette::Result<Self> {
        if defaults.license_name.is_some() != defaults.license_url.is_some() {
            return Err(StagehandError::Config {
                message: "If you provide a license URL you must provide a license name, and vice-versa"
                    .to_string(),
            }
            .into());
        }
        Ok(Self { defaults })
    }

    /// Return the patched document, or `None` when nothing had to be added.
    pub fn patch(&self, xml: &str) -> miette::Result<Option<String>> {
        if self.defaults.is_empty() {
            return Ok(None);
        }
        let present = top_level_elements(xml)?;
        let d = &self.defaults;
        let mut blocks = String::new();

        if let Some(url) = d.project_url.as_deref().filter(|_| !present.contains("url")) {
            blocks.push_str(&format!("  <url>{}</url>\n", escape(url)));
        }
        if !present.contains("licenses") {
            if let (Some(name), Some(url)) = (&d.license_name, &d.license_url) {
                blocks.push_str(&format!(
                    "  <licenses>\n    <license>\n      <name>{}</name>\n      <url>{}</url>\n    </license>\n  </licenses>\n",
                    escape(name.as_str()),
                    escape(url.as_str()),
                ));
            }
        }
        if let Some(url) = d.scm_url.as_deref().filter(|_| !present.contains("scm")) {
            blocks.push_str(&format!("  <scm>\n    <url>{}</url>\n  </scm>\n", escape(url)));
        }
        if let Some(name) = d
            .developer_name
            .as_deref()
            .filter(|_| !present.contains("developers"))
        {
            blocks.push_str(&format!(
                "  <developers>\n    <developer>\n      <name>{}</name>\n    </developer>\n  </developers>\n",
                escape(name),
            ));
        }

        if blocks.is_empty() {
            return Ok(None);
        }

        let close = xml.rfind("</project>").ok_or_else(|| StagehandError::Pom {
            message: "no closing </project> tag".to_string(),
        })?;
        let head = &xml[..close];
        let separator = if head.ends_with('\n') { "" } else { "\n" };
        Ok(Some(format!("{head}{separator}{blocks}{}", &xml[close..])))
    }
}

/// Names of the direct children of the `<project>` root element.
fn top_level_elements(xml: &str) -> miette::Result<BTreeSet<String>> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut root: Option<String> = None;
    let mut found = BTreeSet::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match depth {
                    0 => root = Some(name),
                    1 => {
                        found.insert(name);
                    }
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match depth {
                    0 => root = Some(name),
                    1 => {
                        found.insert(name);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(StagehandError::Pom {
                    message: format!(
                        "invalid XML at position {}: {e}",
                        reader.error_position()
                    ),
                }
                .into())
            }
            _ => {}
        }
    }

    match root.as_deref() {
        Some("project") => Ok(found),
        Some(other) => Err(StagehandError::Pom {
            message: format!("root element is <{other}>, expected <project>"),
        }
        .into()),
        None => Err(StagehandError::Pom {
            message: "document has no root element".to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>lib</artifactId>
  <version>1.0</version>
</project>
"#;

    fn all_defaults() -> PomDefaults {
        PomDefaults {
            project_url: Some("https://example.com".to_string()),
            license_name: Some("MIT".to_string()),
            license_url: Some("https://opensource.org/licenses/MIT".to_string()),
            developer_name: Some("Jane & John".to_string()),
            scm_url: Some("https://github.com/example/lib".to_string()),
        }
    }

    #[test]
    fn no_defaults_means_no_patch() {
        let patcher = PomPatcher::new(PomDefaults::default()).unwrap();
        assert_eq!(patcher.patch(MINIMAL).unwrap(), None);
    }

    #[test]
    fn adds_every_missing_block() {
        let patcher = PomPatcher::new(all_defaults()).unwrap();
        let patched = patcher.patch(MINIMAL).unwrap().unwrap();
        assert!(patched.contains("<url>https://example.com</url>"));
        assert!(patched.contains("<name>MIT</name>"));
        assert!(patched.contains("<scm>"));
        assert!(patched.contains("<name>Jane &amp; John</name>"));
        assert!(patched.trim_end().ends_with("</project>"));
        assert!(patched.starts_with(&MINIMAL[..MINIMAL.find("</project>").unwrap()]));
        // Result stays well-formed and now has every block at top level.
        let present = top_level_elements(&patched).unwrap();
        for name in ["url", "licenses", "scm", "developers"] {
            assert!(present.contains(name), "missing {name}");
        }
    }

    #[test]
    fn existing_blocks_are_left_alone() {
        let xml = r#"<project>
  <url>https://already.there</url>
  <licenses><license><name>Apache</name></license></licenses>
  <scm><url>x</url></scm>
  <developers><developer><name>x</name></developer></developers>
</project>"#;
        let patcher = PomPatcher::new(all_defaults()).unwrap();
        assert_eq!(patcher.patch(xml).unwrap(), None);
    }

    #[test]
    fn nested_url_does_not_count_as_project_url() {
        let xml = "<project><scm><url>x</url></scm></project>";
        let defaults = PomDefaults {
            project_url: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let patched = PomPatcher::new(defaults).unwrap().patch(xml).unwrap().unwrap();
        assert!(patched.contains("  <url>https://example.com</url>\n</project>"));
    }

    #[test]
    fn half_license_is_rejected() {
        let defaults = PomDefaults {
            license_name: Some("MIT".to_string()),
            ..Default::default()
        };
        assert!(PomPatcher::new(defaults).is_err());
    }

    #[test]
    fn non_pom_root_is_rejected() {
        let patcher = PomPatcher::new(all_defaults()).unwrap();
        let err = patcher.patch("<settings></settings>").unwrap_err();
        assert!(err.to_string().contains("expected <project>"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let patcher = PomPatcher::new(all_defaults()).unwrap();
        assert!(patcher.patch("<project><url></project>").is_err());
    }
}
