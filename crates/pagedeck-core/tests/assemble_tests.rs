use lopdf::{Dictionary, Document, Object, Stream};
use pagedeck_core::*;

/// Build a document whose pages carry a distinguishing width in their
/// MediaBox so output order can be asserted after assembly.
fn create_test_pdf_with_widths(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(widths.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Page dictionaries inherit MediaBox and Resources from the page tree
/// node instead of carrying their own.
fn create_test_pdf_with_inherited_attrs(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

struct StubRenderer;

impl PageRenderer for StubRenderer {
    fn render_page(&self, _bytes: &[u8], _page_number: u32) -> Result<Thumbnail> {
        Thumbnail::from_rgba(vec![255; (THUMBNAIL_WIDTH * 10 * 4) as usize], THUMBNAIL_WIDTH, 10)
    }
}

fn load(session: &mut Session, doc: Document, name: &str) {
    load_document(session, to_bytes(doc), name, &StubRenderer).unwrap();
}

fn entry_ids(session: &Session) -> Vec<PageId> {
    session.entries().iter().map(|e| e.id()).collect()
}

fn page_dicts(doc: &Document) -> Vec<Dictionary> {
    doc.get_pages()
        .values()
        .map(|id| doc.get_dictionary(*id).unwrap().clone())
        .collect()
}

fn media_box_width(dict: &Dictionary) -> i64 {
    let array = dict.get(b"MediaBox").unwrap().as_array().unwrap();
    array[2].as_i64().unwrap()
}

fn rotate_value(dict: &Dictionary) -> i64 {
    dict.get(b"Rotate").unwrap().as_i64().unwrap()
}

#[test]
fn test_assemble_empty_session_fails() {
    let session = Session::new();
    assert!(matches!(assemble(&session), Err(EditorError::NoPages)));
}

#[test]
fn test_assemble_preserves_model_order() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200, 300]), "a.pdf");
    let ids = entry_ids(&session);
    session.apply(EditCommand::Reorder { from: 2, to: 0 });
    assert_eq!(entry_ids(&session), vec![ids[2], ids[0], ids[1]]);

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    assert_eq!(pages.len(), 3);
    let widths: Vec<i64> = pages.iter().map(media_box_width).collect();
    assert_eq!(widths, vec![300, 100, 200]);
}

#[test]
fn test_assemble_interleaves_pages_across_sources() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200]), "a.pdf");
    load(&mut session, create_test_pdf_with_widths(&[300, 400]), "b.pdf");
    // a1, b1, a2, b2
    session.apply(EditCommand::Reorder { from: 2, to: 1 });

    let output = assemble(&session).unwrap();
    let widths: Vec<i64> = page_dicts(&output).iter().map(media_box_width).collect();
    assert_eq!(widths, vec![100, 300, 200, 400]);
}

#[test]
fn test_assemble_stamps_absolute_rotation() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200]), "a.pdf");
    let ids = entry_ids(&session);
    session.apply(EditCommand::Rotate(ids[1]));
    session.apply(EditCommand::Rotate(ids[1]));

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    // Unrotated pages get an explicit 0
    assert_eq!(rotate_value(&pages[0]), 0);
    assert_eq!(rotate_value(&pages[1]), 180);
}

#[test]
fn test_assemble_duplicates_rotate_independently() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100]), "a.pdf");
    let original = entry_ids(&session)[0];
    session.apply(EditCommand::Duplicate(original));
    let copy = entry_ids(&session)[1];
    session.apply(EditCommand::Rotate(copy));

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    assert_eq!(pages.len(), 2);
    assert_eq!(rotate_value(&pages[0]), 0);
    assert_eq!(rotate_value(&pages[1]), 90);
    assert_eq!(media_box_width(&pages[0]), 100);
    assert_eq!(media_box_width(&pages[1]), 100);
}

#[test]
fn test_assemble_repeated_page_across_sources_with_mixed_rotations() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100]), "a.pdf");
    load(&mut session, create_test_pdf_with_widths(&[300, 400]), "b.pdf");

    // Shape the model into a1, b2, a1 with rotations 0, 90, 180
    let ids = entry_ids(&session);
    session.apply(EditCommand::Delete(ids[1]));
    session.apply(EditCommand::Duplicate(ids[0]));
    session.apply(EditCommand::Reorder { from: 1, to: 2 });
    let ids = entry_ids(&session);
    session.apply(EditCommand::Rotate(ids[1]));
    session.apply(EditCommand::Rotate(ids[2]));
    session.apply(EditCommand::Rotate(ids[2]));

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    assert_eq!(pages.len(), 3);
    let widths: Vec<i64> = pages.iter().map(media_box_width).collect();
    assert_eq!(widths, vec![100, 400, 100]);
    let rotations: Vec<i64> = pages.iter().map(rotate_value).collect();
    assert_eq!(rotations, vec![0, 90, 180]);
}

#[test]
fn test_assemble_resolves_inherited_page_attributes() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_inherited_attrs(2), "a4.pdf");

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    // The old page tree is gone, so the attributes must have been
    // copied down onto each page.
    for page in &pages {
        assert_eq!(media_box_width(page), 595);
        assert!(page.get(b"Resources").is_ok());
    }
}

#[test]
fn test_assemble_includes_blank_pages() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100]), "a.pdf");
    session.apply(EditCommand::InsertBlank);

    let output = assemble(&session).unwrap();
    let pages = page_dicts(&output);

    assert_eq!(pages.len(), 2);
    assert_eq!(media_box_width(&pages[1]), 612);
}

#[test]
fn test_assemble_does_not_mutate_the_session() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200]), "a.pdf");
    let before = entry_ids(&session);

    let _ = assemble(&session).unwrap();
    let _ = assemble(&session).unwrap();

    assert_eq!(entry_ids(&session), before);
    assert_eq!(session.sources().len(), 1);
}

#[test]
fn test_assembled_output_round_trips_through_the_parser() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200, 300]), "a.pdf");

    let bytes = serialize(assemble(&session).unwrap()).unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), 3);
}

#[test]
fn test_split_rejects_single_page_model() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100]), "a.pdf");

    assert!(matches!(split(&session, 1), Err(EditorError::Validation(_))));
}

#[test]
fn test_split_rejects_out_of_range_points() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200, 300]), "a.pdf");

    assert!(matches!(split(&session, 0), Err(EditorError::Validation(_))));
    assert!(matches!(split(&session, 3), Err(EditorError::Validation(_))));
}

#[test]
fn test_split_partitions_the_model() {
    let mut session = Session::new();
    load(
        &mut session,
        create_test_pdf_with_widths(&[100, 200, 300, 400]),
        "a.pdf",
    );

    let (first, second) = split(&session, 3).unwrap();

    let first_widths: Vec<i64> = page_dicts(&first).iter().map(media_box_width).collect();
    let second_widths: Vec<i64> = page_dicts(&second).iter().map(media_box_width).collect();
    assert_eq!(first_widths, vec![100, 200, 300]);
    assert_eq!(second_widths, vec![400]);
}

#[test]
fn test_split_carries_rotation_into_both_parts() {
    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200]), "a.pdf");
    session.apply(EditCommand::RotateAll);

    let (first, second) = split(&session, 1).unwrap();

    assert_eq!(rotate_value(&page_dicts(&first)[0]), 90);
    assert_eq!(rotate_value(&page_dicts(&second)[0]), 90);
}

#[tokio::test]
async fn test_save_pdf_writes_a_loadable_file() {
    use tempfile::TempDir;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join(DEFAULT_OUTPUT_NAME);

    let mut session = Session::new();
    load(&mut session, create_test_pdf_with_widths(&[100, 200]), "a.pdf");
    session.apply(EditCommand::Rotate(entry_ids(&session)[0]));

    let output = assemble(&session).unwrap();
    save_pdf(output, &output_path).await.unwrap();

    assert!(output_path.exists());
    let reloaded = Document::load(&output_path).unwrap();
    assert_eq!(reloaded.get_pages().len(), 2);
    let pages = page_dicts(&reloaded);
    assert_eq!(rotate_value(&pages[0]), 90);
}
