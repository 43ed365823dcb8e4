use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use nd_core::{Error, Feed, FeedEntry, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    Summary,
    Content,
}

/// Entry children we read. Anything carrying another prefix (`itunes:summary`,
/// `media:title`, ...) is ignored.
fn entry_field(name: &str) -> Option<Field> {
    match name {
        "title" => Some(Field::Title),
        "link" => Some(Field::Link),
        "description" | "summary" => Some(Field::Summary),
        "content" | "content:encoded" => Some(Field::Content),
        _ => None,
    }
}

#[derive(Default)]
struct PendingEntry {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    content: Option<String>,
}

impl PendingEntry {
    /// First non-empty value wins.
    fn set(&mut self, field: Field, value: String) {
        if value.is_empty() {
            return;
        }
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn finish(self) -> FeedEntry {
        FeedEntry {
            title: self.title,
            link: self.link,
            summary: self.summary.or(self.content),
        }
    }
}

/// Text being gathered for one field, including text nested in child markup
/// such as Atom `type="xhtml"` content.
struct Capture {
    field: Option<Field>,
    depth: usize,
    text: String,
}

fn is_entry(element: &str) -> bool {
    element == "item" || element == "entry"
}

/// Qualified element name, with an explicit `atom:` prefix folded away.
fn element_name(start: &BytesStart) -> String {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    match name.strip_prefix("atom:") {
        Some(local) => local.to_string(),
        None => name,
    }
}

fn text_of(text: &BytesText) -> String {
    match text.unescape() {
        Ok(unescaped) => unescaped.into_owned(),
        // Feeds in the wild carry HTML entities XML does not know about.
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

/// `href` of an Atom `<link>`, unless it points somewhere other than the
/// article itself (`rel="self"`, `rel="enclosure"`, ...).
fn atom_href(start: &BytesStart) -> Result<Option<String>> {
    let attribute = |name: &str| -> Result<Option<String>> {
        match start.try_get_attribute(name).map_err(|e| Error::Feed(e.to_string()))? {
            Some(attr) => Ok(Some(
                attr.unescape_value()
                    .map_err(|e| Error::Feed(e.to_string()))?
                    .into_owned(),
            )),
            None => Ok(None),
        }
    };

    match attribute("rel")?.as_deref() {
        None | Some("alternate") => attribute("href"),
        Some(_) => Ok(None),
    }
}

/// Parses an RSS 2.0, RSS 1.0 (RDF) or Atom document.
pub fn parse_feed(xml: &str) -> Result<Feed> {
    let mut reader = Reader::from_str(xml);

    let mut feed = Feed::default();
    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<(usize, PendingEntry)> = None;
    let mut capture: Option<Capture> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if path.is_empty() {
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if !matches!(local.as_str(), "rss" | "feed" | "RDF") {
                        return Err(Error::Feed(format!("not an RSS or Atom document (root <{}>)", name)));
                    }
                    saw_root = true;
                }

                if capture.is_none() {
                    let depth = path.len() + 1;
                    let entry_depth = entry.as_ref().map(|(d, _)| *d);
                    if entry_depth == Some(path.len()) {
                        if let Some(field) = entry_field(&name) {
                            if field == Field::Link {
                                if let (Some(href), Some((_, pending))) = (atom_href(&e)?, entry.as_mut()) {
                                    pending.set(Field::Link, href);
                                }
                            }
                            capture = Some(Capture { field: Some(field), depth, text: String::new() });
                        }
                    } else if entry_depth.is_none() {
                        let parent = path.last().map(String::as_str);
                        if is_entry(&name) {
                            entry = Some((depth, PendingEntry::default()));
                        } else if name == "title"
                            && matches!(parent, Some("channel") | Some("feed"))
                            && feed.title.is_none()
                        {
                            capture = Some(Capture { field: None, depth, text: String::new() });
                        }
                    }
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                if let Some((entry_depth, pending)) = entry.as_mut() {
                    if capture.is_none() && *entry_depth == path.len() && element_name(&e) == "link" {
                        if let Some(href) = atom_href(&e)? {
                            pending.set(Field::Link, href);
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(capture) = capture.as_mut() {
                    capture.text.push_str(&text_of(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(capture) = capture.as_mut() {
                    capture.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let depth = path.len();
                if capture.as_ref().map_or(false, |c| c.depth == depth) {
                    if let Some(done) = capture.take() {
                        let value = done.text.trim().to_string();
                        match (done.field, entry.as_mut()) {
                            (Some(field), Some((_, pending))) => pending.set(field, value),
                            (None, _) if !value.is_empty() => feed.title = Some(value),
                            _ => {}
                        }
                    }
                } else if entry.as_ref().map_or(false, |(d, _)| *d == depth) {
                    if let Some((_, pending)) = entry.take() {
                        feed.entries.push(pending.finish());
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Feed(format!(
                    "malformed feed at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::Feed("empty document".to_string()));
    }
    Ok(feed)
}
