mod common;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use docxide_html::{ConvertOptions, ImageHandler, ImageSize, Relationships, convert, media};

use common::{Parts, docx_bytes, drawing, pict, png_bytes, rels_xml, render_with, write_png};

fn with_image(target: &str) -> Parts {
    Parts {
        rels: Some(rels_xml(&[("rId0", target)])),
        ..Default::default()
    }
}

fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0, 0, 0]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Bmp)
        .expect("encode bmp");
    out.into_inner()
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn declared_size_becomes_dimensions() {
    let html = render_with(&drawing("rId0", Some((40, 20))), &with_image("media/image1.png"));
    assert_eq!(
        html,
        r#"<html><p><img src="media/image1.png" height="20" width="40" /></p></html>"#
    );
}

#[test]
fn undeclared_size_is_read_from_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "pic.png", 6, 4);
    let html = render_with(&drawing("rId0", None), &with_image(&display(&path)));
    assert_eq!(
        html,
        format!(
            r#"<html><p><img src="{}" height="4" width="6" /></p></html>"#,
            display(&path)
        )
    );
}

#[test]
fn unknown_or_zero_sizes_are_omitted() {
    let parts = with_image("media/missing.png");
    assert_eq!(
        render_with(&drawing("rId0", None), &parts),
        r#"<html><p><img src="media/missing.png" /></p></html>"#
    );
    assert_eq!(
        render_with(&drawing("rId0", Some((0, 0))), &parts),
        r#"<html><p><img src="media/missing.png" /></p></html>"#
    );
}

#[test]
fn metafiles_are_dropped() {
    for target in ["media/image1.emf", "media/image1.WMF", "media/image1.svg"] {
        assert_eq!(
            render_with(&drawing("rId0", Some((10, 10))), &with_image(target)),
            "<html></html>",
            "{target}"
        );
    }
}

#[test]
fn legacy_pictures() {
    let parts = with_image("media/image1.png");
    assert_eq!(
        render_with(&pict(Some("rId0")), &parts),
        r#"<html><p><img src="media/image1.png" /></p></html>"#
    );
    assert_eq!(render_with(&pict(None), &parts), "<html></html>");
    assert_eq!(render_with(&pict(Some("rId7")), &parts), "<html></html>");
}

#[test]
fn custom_image_handler_chooses_src() {
    let handler: ImageHandler = Arc::new(|id: &str, rels: &Relationships| {
        format!("/static/{}?id={id}", rels.get(id).unwrap_or_default())
    });
    let options = ConvertOptions {
        image_handler: Some(handler),
        ..Default::default()
    };
    let html = common::try_render_with(
        &drawing("rId0", Some((2, 3))),
        &with_image("media/image1.png"),
        &options,
    )
    .unwrap();
    assert_eq!(
        html,
        r#"<html><p><img src="/static/media/image1.png?id=rId0" height="3" width="2" /></p></html>"#
    );
}

#[test]
fn inline_extent_is_used_without_a_transform() {
    let body = r#"<w:p><w:r><w:drawing><wp:inline><wp:extent cx="952500" cy="476250"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId0"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#;
    assert_eq!(
        render_with(body, &with_image("media/image1.png")),
        r#"<html><p><img src="media/image1.png" height="50" width="100" /></p></html>"#
    );
}

#[test]
fn packaged_media_is_extracted_and_normalized() {
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let body = [
        drawing("rId1", Some((4, 2))),
        drawing("rId2", None),
        drawing("rId3", Some((10, 10))),
    ]
    .concat();
    let rels = rels_xml(&[
        ("rId1", "media/image1.png"),
        ("rId2", "media/image2.bmp"),
        ("rId3", "media/image3.emf"),
    ]);
    let docx = dir.path().join("doc.docx");
    std::fs::write(
        &docx,
        docx_bytes(&[
            ("word/document.xml", common::xml(&body).into_bytes()),
            ("word/_rels/document.xml.rels", rels.into_bytes()),
            ("word/media/image1.png", png_bytes(8, 8)),
            ("word/media/image2.bmp", bmp_bytes(3, 5)),
            ("word/media/image3.emf", vec![0; 16]),
        ]),
    )
    .unwrap();

    let options = ConvertOptions {
        media_dir: Some(out.clone()),
        ..Default::default()
    };
    let html = convert(&docx, &options).unwrap();

    let png = out.join("word/media/image1.png");
    let gif = out.join("word/media/image2.gif");
    assert_eq!(
        html,
        format!(
            r#"<html><p><img src="{}" height="2" width="4" /></p><p><img src="{}" height="5" width="3" /></p></html>"#,
            display(&png),
            display(&gif)
        )
    );
    assert_eq!(media::read_size(&png), Some(ImageSize::new(4, 2)));
    assert_eq!(media::read_size(&gif), Some(ImageSize::new(3, 5)));
}

#[test]
fn package_absolute_targets_resolve_to_extracted_media() {
    let dir = tempfile::tempdir().unwrap();
    let docx = dir.path().join("abs.docx");
    std::fs::write(
        &docx,
        docx_bytes(&[
            (
                "word/document.xml",
                common::xml(&drawing("rId1", Some((6, 6)))).into_bytes(),
            ),
            (
                "word/_rels/document.xml.rels",
                rels_xml(&[("rId1", "/word/media/image1.png")]).into_bytes(),
            ),
            ("word/media/image1.png", png_bytes(6, 6)),
        ]),
    )
    .unwrap();

    let html = convert(&docx, &ConvertOptions::default()).unwrap();
    let extracted = dir.path().join("word/media/image1.png");
    assert_eq!(
        html,
        format!(
            r#"<html><p><img src="{}" height="6" width="6" /></p></html>"#,
            display(&extracted)
        )
    );
}
