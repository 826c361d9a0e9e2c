//! Structural comparison of store-native note type records.
//!
//! Fields and templates are matched by `ord`, never by array position: the
//! store is free to keep them in any order.

use crate::storage::{FieldRecord, NotetypeRecord, TemplateRecord};
use crate::sync::types::{SyncError, SyncResult};

/// Whether `new` differs from `old` in any way that warrants a write.
///
/// Store-assigned bookkeeping (`id`, `mod`, `usn`, `req`,
/// `originalStockKind`) is ignored.
///
/// # Errors
///
/// Returns `SyncError::MatchIntegrity` if a field or template of `new` has
/// no counterpart with the same `ord` in `old`.
pub fn is_different(old: &NotetypeRecord, new: &NotetypeRecord) -> SyncResult<bool> {
    if new.name != old.name
        || new.css != old.css
        || new.sortf != old.sortf
        || new.kind != old.kind
        || new.latex_pre != old.latex_pre
        || new.latex_post != old.latex_post
        || new.latexsvg != old.latexsvg
        || new.did != old.did
    {
        return Ok(true);
    }

    if new.flds.len() != old.flds.len() {
        return Ok(true);
    }
    for new_field in &new.flds {
        let old_field = find_by_ord(&old.flds, new_field.ord, |f| f.ord)
            .ok_or_else(|| mismatch(new, "field", new_field.ord))?;
        if fields_differ(old_field, new_field) {
            return Ok(true);
        }
    }

    if new.tmpls.len() != old.tmpls.len() {
        return Ok(true);
    }
    for new_template in &new.tmpls {
        let old_template = find_by_ord(&old.tmpls, new_template.ord, |t| t.ord)
            .ok_or_else(|| mismatch(new, "template", new_template.ord))?;
        if templates_differ(old_template, new_template) {
            return Ok(true);
        }
    }

    Ok(false)
}

fn find_by_ord<T>(items: &[T], ord: u32, ord_of: impl Fn(&T) -> u32) -> Option<&T> {
    items.iter().find(|item| ord_of(*item) == ord)
}

fn mismatch(record: &NotetypeRecord, kind: &'static str, ord: u32) -> SyncError {
    SyncError::MatchIntegrity {
        notetype: record.name.clone(),
        kind,
        ord,
    }
}

fn fields_differ(old: &FieldRecord, new: &FieldRecord) -> bool {
    new.name != old.name
        || new.description != old.description
        || new.exclude_from_search != old.exclude_from_search
        || new.sticky != old.sticky
        || new.collapsed != old.collapsed
        || new.font != old.font
        || new.size != old.size
        || new.rtl != old.rtl
        || new.plain_text != old.plain_text
}

fn templates_differ(old: &TemplateRecord, new: &TemplateRecord) -> bool {
    new.name != old.name
        || new.qfmt != old.qfmt
        || new.afmt != old.afmt
        || new.bqfmt != old.bqfmt
        || new.bafmt != old.bafmt
        || new.bfont != old.bfont
        || new.bsize != old.bsize
        || new.did != old.did
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ord: u32, name: &str) -> FieldRecord {
        FieldRecord {
            ord,
            name: name.to_string(),
            description: String::new(),
            exclude_from_search: false,
            sticky: false,
            collapsed: false,
            font: "Verdana".into(),
            size: 20,
            rtl: false,
            plain_text: false,
        }
    }

    fn template(ord: u32, name: &str) -> TemplateRecord {
        TemplateRecord {
            ord,
            name: name.to_string(),
            qfmt: format!("{{{{Front}}}} {ord}"),
            afmt: "{{Back}}".into(),
            bqfmt: String::new(),
            bafmt: String::new(),
            bfont: String::new(),
            bsize: 0,
            did: None,
        }
    }

    fn record() -> NotetypeRecord {
        NotetypeRecord {
            id: 1_700_000_000_000,
            name: "Basic (and reversed card)".into(),
            kind: 0,
            modification_time: 1_700_000_000,
            usn: 12,
            sortf: 0,
            did: None,
            tmpls: vec![template(0, "Card 1"), template(1, "Card 2")],
            flds: vec![field(0, "Front"), field(1, "Back"), field(2, "Extra")],
            css: ".card {}".into(),
            latex_pre: "\\begin{document}".into(),
            latex_post: "\\end{document}".into(),
            latexsvg: true,
            req: vec![serde_json::json!([0, "any", [0]])],
            original_stock_kind: 1,
        }
    }

    #[test]
    fn test_identical_records() {
        assert!(!is_different(&record(), &record()).unwrap());
    }

    #[test]
    fn test_bookkeeping_ignored() {
        let old = record();
        let mut new = record();
        new.id = 0;
        new.modification_time = 0;
        new.usn = -1;
        new.req = vec![];
        new.original_stock_kind = 0;

        assert!(!is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_top_level_changes() {
        let old = record();
        let edits: Vec<fn(&mut NotetypeRecord)> = vec![
            |r| r.name = "Renamed".into(),
            |r| r.css = ".card { color: red; }".into(),
            |r| r.sortf = 1,
            |r| r.kind = 1,
            |r| r.latex_pre = String::new(),
            |r| r.latex_post = String::new(),
            |r| r.latexsvg = false,
            |r| r.did = Some(1),
        ];

        for edit in edits {
            let mut new = record();
            edit(&mut new);
            assert!(is_different(&old, &new).unwrap());
        }
    }

    #[test]
    fn test_single_field_attribute_change() {
        let old = record();
        let mut new = record();
        new.flds[2].collapsed = true;

        assert!(is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_field_defaults_compared() {
        let mut old = record();
        old.flds[0].font = "Arial".into();

        assert!(is_different(&old, &record()).unwrap());
    }

    #[test]
    fn test_template_body_change() {
        let old = record();
        let mut new = record();
        new.tmpls[1].qfmt = "{{Back}}".into();

        assert!(is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_template_deck_override_change() {
        let old = record();
        let mut new = record();
        new.tmpls[0].did = Some(99);

        assert!(is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_count_change() {
        let old = record();
        let mut new = record();
        new.flds.pop();
        assert!(is_different(&old, &new).unwrap());

        let mut new = record();
        new.tmpls.push(template(2, "Card 3"));
        assert!(is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_matches_by_ord_not_position() {
        let old = record();
        let mut new = record();
        new.flds.reverse();
        new.tmpls.reverse();

        assert!(!is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_missing_ord_is_integrity_error() {
        let old = record();
        let mut new = record();
        new.flds[2].ord = 7;

        let result = is_different(&old, &new);
        assert!(matches!(
            result,
            Err(SyncError::MatchIntegrity { kind: "field", ord: 7, .. })
        ));
    }

    #[test]
    fn test_missing_template_ord_is_integrity_error() {
        let old = record();
        let mut new = record();
        new.tmpls[0].ord = 5;

        let result = is_different(&old, &new);
        assert!(matches!(
            result,
            Err(SyncError::MatchIntegrity { kind: "template", ord: 5, .. })
        ));
    }
}
