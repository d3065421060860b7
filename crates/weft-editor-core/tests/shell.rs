// Shell behaviour seen from the host: content strings, notifications,
// view toggling, variables and image insertion.

use std::cell::RefCell;
use std::rc::Rc;

use bytes::Bytes;
use weft_editor_core::{
    Alignment, BlockKind, EditorCommand, EditorConfig, EditorError, EditorShell, HeadingLevel,
    ImageFile, ReferenceRegistry, Selection, Variable, ViewMode,
};

type Log = Rc<RefCell<Vec<String>>>;

fn shell(initial: &str) -> (EditorShell<impl FnMut(&str)>, Log, Rc<ReferenceRegistry>) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    let registry = Rc::new(ReferenceRegistry::new());
    let shell = EditorShell::new(
        EditorConfig::default(),
        initial,
        Rc::clone(&registry),
        move |content: &str| sink.borrow_mut().push(content.to_string()),
    )
    .unwrap();
    (shell, log, registry)
}

fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", Bytes::from_static(b"\x89PNG"))
}

#[test]
fn toggling_twice_restores_content_exactly() {
    let messy = "<div class=\"x\">Hi <STRONG>there</STRONG><br/>&nbsp;</div>";
    let (mut shell, log, _) = shell(messy);

    assert_eq!(shell.toggle_view_mode(), ViewMode::Raw);
    assert_eq!(shell.content(), messy);
    assert_eq!(shell.toggle_view_mode(), ViewMode::Rich);
    assert_eq!(shell.content(), messy);
    assert!(log.borrow().is_empty());
}

#[test]
fn toggling_after_rich_edit_keeps_edited_markup() {
    let (mut shell, log, _) = shell("<p>hello</p>");
    shell.set_selection(Some(Selection::new(0, 5)));
    assert!(shell.apply_command(&EditorCommand::Bold).unwrap());
    let edited = shell.content().into_owned();
    assert_eq!(edited, "<p><b>hello</b></p>");

    shell.toggle_view_mode();
    assert_eq!(shell.content(), edited);
    shell.toggle_view_mode();
    assert_eq!(shell.content(), edited);
    assert_eq!(*log.borrow(), vec![edited]);
}

#[test]
fn raw_edits_survive_toggle_back() {
    let (mut shell, log, _) = shell("");
    shell.toggle_view_mode();
    shell.edit_raw("<h2>Raw</h2><p>typed</p>").unwrap();
    shell.toggle_view_mode();
    assert_eq!(shell.content(), "<h2>Raw</h2><p>typed</p>");
    assert_eq!(shell.document().unwrap().plain_text(), "Raw\ntyped");
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn set_content_does_not_echo_back() {
    let (mut shell, log, _) = shell("<p>a</p>");
    shell.set_content("<p>b</p>");
    assert_eq!(shell.content(), "<p>b</p>");
    assert!(log.borrow().is_empty());

    // A host feeding the reported value straight back is a no-op.
    shell.set_selection(Some(Selection::collapsed(1)));
    shell.type_text("c").unwrap();
    let reported = log.borrow().last().cloned().unwrap();
    shell.set_content(&reported);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(shell.content(), "<p>bc</p>");
}

#[test]
fn block_format_on_empty_document_survives_toggle() {
    let (mut shell, log, _) = shell("");
    shell.set_selection(Some(Selection::collapsed(0)));
    assert!(shell.apply_named_command("formatBlock", Some("h1")).unwrap());
    assert!(shell.apply_named_command("justifyCenter", None).unwrap());
    let expected = r#"<h1 style="text-align: center;"></h1>"#;
    assert_eq!(shell.content(), expected);
    assert_eq!(log.borrow().last().map(String::as_str), Some(expected));
    assert_eq!(log.borrow().len(), 2);

    shell.toggle_view_mode();
    shell.toggle_view_mode();
    let block = &shell.document().unwrap().blocks()[0];
    assert_eq!(block.kind, BlockKind::Heading(HeadingLevel::new(1).unwrap()));
    assert_eq!(block.align, Some(Alignment::Center));
    assert_eq!(shell.content(), expected);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn deleting_all_text_keeps_the_heading() {
    let (mut shell, log, _) = shell(r#"<h2 style="text-align: center">Title</h2>"#);
    shell.set_selection(Some(Selection::new(0, 5)));
    assert!(shell.delete_selection().unwrap());
    let expected = r#"<h2 style="text-align: center;"></h2>"#;
    assert_eq!(shell.content(), expected);
    assert_eq!(*log.borrow(), vec![expected.to_string()]);

    shell.toggle_view_mode();
    shell.toggle_view_mode();
    let block = &shell.document().unwrap().blocks()[0];
    assert_eq!(block.kind, BlockKind::Heading(HeadingLevel::new(2).unwrap()));
    assert_eq!(block.align, Some(Alignment::Center));
    assert!(block.inlines.is_empty());
}

#[test]
fn commands_are_rejected_in_raw_mode() {
    let (mut shell, _, _) = shell("<p>x</p>");
    shell.toggle_view_mode();
    let err = shell.apply_named_command("bold", None).unwrap_err();
    assert_eq!(
        err,
        EditorError::CommandInRawMode {
            command: "bold".into()
        }
    );
    assert_eq!(shell.content(), "<p>x</p>");
}

#[test]
fn named_commands_format_the_selection() {
    let (mut shell, _, _) = shell("<p>Hello world</p>");
    shell.set_selection(Some(Selection::new(6, 11)));
    shell.apply_named_command("foreColor", Some("#FF0000")).unwrap();
    shell.apply_named_command("fontName", Some("Georgia")).unwrap();
    shell.apply_named_command("justifyCenter", None).unwrap();
    shell.apply_named_command("formatBlock", Some("h3")).unwrap();
    insta::assert_snapshot!(
        shell.content(),
        @r#"<h3 style="text-align: center;">Hello <span style="font-family: Georgia; color: #FF0000;">world</span></h3>"#
    );
}

#[test]
fn variable_lands_at_the_caret_in_rich_mode() {
    let (mut shell, log, _) = shell("<p>Dear ,</p>");
    shell.set_selection(Some(Selection::collapsed(5)));
    shell.insert_variable("userName").unwrap();
    assert_eq!(shell.content(), "<p>Dear {{userName}},</p>");
    assert_eq!(shell.selection(), Some(Selection::collapsed(17)));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn variable_without_selection_appends_in_rich_mode() {
    let (mut shell, _, _) = shell("<p>Total:</p>");
    shell.insert_variable("orderTotal").unwrap();
    assert_eq!(shell.content(), "<p>Total:{{orderTotal}}</p>");
}

#[test]
fn variable_is_appended_in_raw_mode() {
    let (mut shell, log, _) = shell("<p>Hi</p>");
    shell.toggle_view_mode();
    shell.insert_variable("date").unwrap();
    assert_eq!(shell.content(), "<p>Hi</p>{{date}}");
    assert_eq!(*log.borrow(), vec!["<p>Hi</p>{{date}}".to_string()]);
}

#[test]
fn invalid_variable_names_are_rejected() {
    let (mut shell, log, _) = shell("<p>Hi</p>");
    let err = shell.insert_variable("first name").unwrap_err();
    assert_eq!(err, EditorError::InvalidVariable("first name".into()));
    assert_eq!(shell.content(), "<p>Hi</p>");
    assert!(log.borrow().is_empty());
}

#[test]
fn non_image_files_never_open_the_cropper() {
    let (mut shell, log, _) = shell("<p>keep</p>");
    let pdf = ImageFile::new("doc.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
    assert!(!shell.handle_image_selected(pdf));
    assert!(!shell.cropper_open());
    assert!(shell.pending_image().is_none());
    assert_eq!(shell.content(), "<p>keep</p>");
    assert!(log.borrow().is_empty());
}

#[test]
fn crop_result_is_inserted_at_the_selection() {
    let (mut shell, _, registry) = shell("<p>ab</p>");
    assert!(shell.handle_image_selected(png("a.png")));
    assert!(shell.cropper_open());

    let reference = registry.create(Bytes::from_static(b"jpeg"), "image/jpeg");
    shell.set_selection(Some(Selection::collapsed(1)));
    shell.handle_crop_result(reference.clone());

    assert!(!shell.cropper_open());
    insta::assert_snapshot!(
        shell.content(),
        @r#"<p>a<img src="blob:weft/1" style="max-width: 100%; height: auto; cursor: move;" draggable="true" />b</p>"#
    );
    assert!(registry.is_live(&reference));
}

#[test]
fn crop_result_without_selection_appends() {
    let (mut shell, _, registry) = shell("<p>text</p>");
    shell.handle_image_selected(png("a.png"));
    let reference = registry.create(Bytes::new(), "image/jpeg");
    shell.handle_crop_result(reference);
    let doc = shell.document().unwrap();
    assert_eq!(doc.len(), 5);
    assert_eq!(doc.image_sources().collect::<Vec<_>>(), vec!["blob:weft/1"]);
}

#[test]
fn crop_result_in_raw_mode_appends_markup() {
    let (mut shell, _, registry) = shell("<p>x</p>");
    shell.toggle_view_mode();
    shell.handle_image_selected(png("a.png"));
    shell.handle_crop_result(registry.create(Bytes::new(), "image/jpeg"));
    assert!(!shell.cropper_open());
    assert_eq!(
        shell.content(),
        "<p>x</p><img src=\"blob:weft/1\" style=\"max-width: 100%; height: auto; cursor: move;\" draggable=\"true\" />"
    );
}

#[test]
fn cancelling_the_crop_changes_nothing() {
    let (mut shell, log, _) = shell("<p>x</p>");
    shell.handle_image_selected(png("a.png"));
    shell.handle_crop_cancelled();
    assert!(!shell.cropper_open());
    assert_eq!(shell.content(), "<p>x</p>");
    assert!(log.borrow().is_empty());
}

#[test]
fn removed_images_release_their_reference() {
    let (mut shell, _, registry) = shell("");
    let reference = registry.create(Bytes::from_static(b"jpeg"), "image/jpeg");
    shell.handle_crop_result(reference.clone());
    assert!(registry.is_live(&reference));

    shell.set_selection(Some(Selection::new(0, 1)));
    assert!(shell.delete_selection().unwrap());
    assert_eq!(shell.content(), "");
    assert!(!registry.is_live(&reference));
}

#[test]
fn dropping_the_shell_releases_owned_images() {
    let (mut shell, _, registry) = shell("");
    let reference = registry.create(Bytes::new(), "image/jpeg");
    shell.handle_crop_result(reference.clone());
    drop(shell);
    assert!(!registry.is_live(&reference));
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn placeholder_tracks_empty_content() {
    let (mut shell, _, _) = shell("");
    assert_eq!(shell.placeholder(), Some("Start typing..."));
    shell.type_text("x").unwrap();
    assert!(!shell.placeholder_visible());

    let mut shell = plain_shell(EditorConfig::default(), "");
    shell.toggle_view_mode();
    assert_eq!(shell.placeholder(), Some("Enter HTML here..."));
}

fn plain_shell(config: EditorConfig, initial: &str) -> EditorShell {
    EditorShell::new(config, initial, Rc::new(ReferenceRegistry::new()), ()).unwrap()
}

#[test]
fn toolbar_lists_host_variables_first() {
    let config = EditorConfig {
        variables: vec![Variable::new("orderId", "A-17")],
        ..EditorConfig::default()
    };
    let mut shell = plain_shell(config, "");
    let toolbar = shell.toolbar();
    assert_eq!(toolbar.variables[0], "orderId");
    assert_eq!(toolbar.variables.len(), 9);
    assert_eq!(toolbar.headings[0].preview_size, "18px");
    assert_eq!(toolbar.view_toggle, "HTML");
    shell.toggle_view_mode();
    assert_eq!(shell.toolbar().view_toggle, "Preview");
}
