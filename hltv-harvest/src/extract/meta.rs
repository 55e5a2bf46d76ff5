//! Match format block and veto sequence.

use scraper::ElementRef;

use super::selectors::{child_elements, select_all, select_first, text_of};
use crate::errors::ExtractionError;
use crate::model::{PickBanEntry, VetoSummary};

type Result<T> = std::result::Result<T, ExtractionError>;

/// Format and veto data read from the maps grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedMeta {
    pub best_of: u8,
    pub instance: String,
    pub is_lan: bool,
    pub pick_bans: Vec<PickBanEntry>,
    pub veto: VetoSummary,
    /// No second veto box was present.
    pub forfeit: bool,
}

/// Parses the format text and veto box inside `div.g-grid.maps`.
pub(crate) fn parse_meta(root: ElementRef<'_>) -> Result<ParsedMeta> {
    let grid = select_first(root, "div.g-grid.maps")?;
    let format = text_of(select_first(grid, "div.preformatted-text")?);
    let (best_of, is_lan, instance) = parse_format(&format)?;

    let boxes = select_all(grid, "div.veto-box")?;
    let Some(veto_box) = boxes.get(1).copied() else {
        return Ok(ParsedMeta {
            best_of,
            instance,
            is_lan,
            pick_bans: Vec::new(),
            veto: VetoSummary::default(),
            forfeit: true,
        });
    };

    let lines = veto_lines(veto_box)?;
    let (pick_bans, veto) = fold_veto(lines.iter().map(String::as_str))?;

    Ok(ParsedMeta {
        best_of,
        instance,
        is_lan,
        pick_bans,
        veto,
        forfeit: false,
    })
}

/// Splits `"Best of 3 (LAN) * Grand final"` into best-of, LAN flag and stage.
pub(crate) fn parse_format(text: &str) -> Result<(u8, bool, String)> {
    let mut parts = text.splitn(2, '*');
    let head = parts.next().unwrap_or_default();
    let instance = parts.next().unwrap_or_default().trim().to_string();

    let best_of = head
        .chars()
        .find_map(|c| c.to_digit(10))
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| ExtractionError::invalid("best of", head.trim()))?;
    let is_lan = head.contains("LAN");

    Ok((best_of, is_lan, instance))
}

fn veto_lines(veto_box: ElementRef<'_>) -> Result<Vec<String>> {
    let container = child_elements(veto_box)
        .find(|e| e.value().name() == "div")
        .ok_or_else(|| ExtractionError::missing("veto box content"))?;
    Ok(select_all(container, "div")?
        .into_iter()
        .map(text_of)
        .collect())
}

/// Parses one veto line, e.g. `"2. Natus Vincere picked Mirage"`.
pub(crate) fn parse_veto_line(line: &str) -> Result<PickBanEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let action = ["removed", "picked"]
        .into_iter()
        .find(|verb| tokens.contains(verb));

    match action {
        Some(verb) => {
            if tokens.len() < 4 {
                return Err(ExtractionError::invalid("veto line", line));
            }
            let team = tokens[1..tokens.len() - 2].join(" ");
            let map = tokens[tokens.len() - 1];
            Ok(if verb == "removed" {
                PickBanEntry::ban(team, map)
            } else {
                PickBanEntry::pick(team, map)
            })
        }
        None => tokens
            .get(1)
            .map(|map| PickBanEntry::decider(*map))
            .ok_or_else(|| ExtractionError::invalid("veto line", line)),
    }
}

/// Folds veto lines into the ordered sequence and its summary.
pub(crate) fn fold_veto<'a>(
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<(Vec<PickBanEntry>, VetoSummary)> {
    lines
        .into_iter()
        .try_fold((Vec::new(), VetoSummary::default()), |(mut entries, summary), line| {
            let entry = parse_veto_line(line)?;
            let summary = summary.with_entry(&entry);
            entries.push(entry);
            Ok((entries, summary))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VetoAction;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    #[test]
    fn test_parse_format() {
        let (best_of, lan, instance) =
            parse_format("Best of 3 (LAN) * Grand final").unwrap();
        assert_eq!((best_of, lan, instance.as_str()), (3, true, "Grand final"));

        let (best_of, lan, instance) = parse_format("Best of 1 (Online)").unwrap();
        assert_eq!((best_of, lan, instance.as_str()), (1, false, ""));

        assert!(parse_format("Format unknown").is_err());
    }

    #[test]
    fn test_parse_veto_lines() {
        assert_eq!(
            parse_veto_line("1. Natus Vincere removed Nuke").unwrap(),
            PickBanEntry::ban("Natus Vincere", "Nuke")
        );
        assert_eq!(
            parse_veto_line("3. G2 picked Inferno").unwrap(),
            PickBanEntry::pick("G2", "Inferno")
        );
        assert_eq!(
            parse_veto_line("7. Ancient was left over").unwrap(),
            PickBanEntry::decider("Ancient")
        );
    }

    #[test]
    fn test_parse_veto_line_malformed() {
        assert!(parse_veto_line("removed Nuke").is_err());
        assert!(parse_veto_line("").is_err());
    }

    #[test]
    fn test_fold_veto_is_ordered() {
        let (entries, summary) = fold_veto([
            "1. G2 removed Nuke",
            "2. Natus Vincere removed Vertigo",
            "3. G2 picked Mirage",
            "4. Natus Vincere picked Inferno",
            "7. Ancient was left over",
        ])
        .unwrap();

        let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                VetoAction::Ban,
                VetoAction::Ban,
                VetoAction::Pick,
                VetoAction::Pick,
                VetoAction::Decider
            ]
        );
        assert_eq!(summary.removed, vec!["Nuke", "Vertigo"]);
        assert_eq!(summary.map_pool(), vec!["Mirage", "Inferno", "Ancient"]);
    }

    #[test]
    fn test_parse_meta_without_veto_is_forfeit() {
        let html = Html::parse_document(
            r#"<div class="g-grid maps"><div class="col-6">
                 <div class="standard-box veto-box"><div class="padding preformatted-text">Best of 3 (Online)

* Quarter-final</div></div>
               </div></div>"#,
        );
        let meta = parse_meta(html.root_element()).unwrap();
        assert!(meta.forfeit);
        assert!(meta.pick_bans.is_empty());
        assert_eq!(meta.best_of, 3);
        assert_eq!(meta.instance, "Quarter-final");
    }

    #[test]
    fn test_parse_meta_with_veto() {
        let html = Html::parse_document(
            r#"<div class="g-grid maps"><div class="col-6">
                 <div class="standard-box veto-box"><div class="padding preformatted-text">Best of 1 (LAN) * Final</div></div>
                 <div class="standard-box veto-box"><div class="padding">
                   <div>1. G2 removed Nuke</div>
                   <div>2. Natus Vincere picked Mirage</div>
                   <div>3. Ancient was left over</div>
                 </div></div>
               </div></div>"#,
        );
        let meta = parse_meta(html.root_element()).unwrap();
        assert!(!meta.forfeit);
        assert!(meta.is_lan);
        assert_eq!(meta.pick_bans.len(), 3);
        assert_eq!(meta.veto.decider.as_deref(), Some("Ancient"));
    }
}
