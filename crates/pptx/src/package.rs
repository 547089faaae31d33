//! OOXML package parts shared by every generated deck.
//!
//! The master, layouts and theme are fixed templates; content types,
//! relationships and the presentation part depend on the slide count.

use std::fmt::Write;

pub(crate) const NS_PML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_DML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

mod ct {
    pub const RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

mod rt {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const APP_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

pub(crate) const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
pub(crate) const PACKAGE_RELS_PATH: &str = "_rels/.rels";
pub(crate) const CORE_PROPS_PATH: &str = "docProps/core.xml";
pub(crate) const APP_PROPS_PATH: &str = "docProps/app.xml";
pub(crate) const PRESENTATION_PATH: &str = "ppt/presentation.xml";
pub(crate) const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";
pub(crate) const SLIDE_MASTER_PATH: &str = "ppt/slideMasters/slideMaster1.xml";
pub(crate) const SLIDE_MASTER_RELS_PATH: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub(crate) const THEME_PATH: &str = "ppt/theme/theme1.xml";

/// Layout used by the opening slide.
pub(crate) const TITLE_LAYOUT: usize = 1;
/// Layout used by every other slide.
pub(crate) const CONTENT_LAYOUT: usize = 2;
pub(crate) const LAYOUT_COUNT: usize = 2;

/// 4:3 slide size in EMUs.
const SLIDE_WIDTH: i64 = 9_144_000;
const SLIDE_HEIGHT: i64 = 6_858_000;

/// First `p:sldId` value; PowerPoint requires ids of at least 256.
const FIRST_SLIDE_ID: usize = 256;

pub(crate) const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMaster1.xml");
pub(crate) const THEME_XML: &str = include_str!("../resources/theme1.xml");

/// Static layout template for `index` (1-based).
pub(crate) fn layout_xml(index: usize) -> &'static str {
    match index {
        TITLE_LAYOUT => include_str!("../resources/slideLayout1.xml"),
        _ => include_str!("../resources/slideLayout2.xml"),
    }
}

pub(crate) fn layout_path(index: usize) -> String {
    format!("ppt/slideLayouts/slideLayout{}.xml", index)
}

pub(crate) fn layout_rels_path(index: usize) -> String {
    format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", index)
}

pub(crate) fn slide_path(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

pub(crate) fn slide_rels_path(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A single package relationship.
struct Relationship<'a> {
    id: String,
    rel_type: &'a str,
    target: String,
}

fn relationships_xml(rels: &[Relationship<'_>]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, NS_PACKAGE_RELS);
    for rel in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id, rel.rel_type, rel.target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `[Content_Types].xml` for a deck of `slide_count` slides.
pub(crate) fn content_types_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 160);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES);
    let _ = write!(xml, r#"<Default Extension="rels" ContentType="{}"/>"#, ct::RELS);
    let _ = write!(xml, r#"<Default Extension="xml" ContentType="{}"/>"#, ct::XML);

    let mut add = |part: &str, content_type: &str| {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            part, content_type
        );
    };
    add(PRESENTATION_PATH, ct::PRESENTATION);
    add(SLIDE_MASTER_PATH, ct::SLIDE_MASTER);
    for layout in 1..=LAYOUT_COUNT {
        add(&layout_path(layout), ct::SLIDE_LAYOUT);
    }
    for number in 1..=slide_count {
        add(&slide_path(number), ct::SLIDE);
    }
    add(THEME_PATH, ct::THEME);
    add(CORE_PROPS_PATH, ct::CORE_PROPS);
    add(APP_PROPS_PATH, ct::APP_PROPS);

    xml.push_str("</Types>");
    xml
}

/// `_rels/.rels`.
pub(crate) fn package_rels_xml() -> String {
    relationships_xml(&[
        Relationship {
            id: "rId1".into(),
            rel_type: rt::OFFICE_DOCUMENT,
            target: PRESENTATION_PATH.into(),
        },
        Relationship {
            id: "rId2".into(),
            rel_type: rt::CORE_PROPS,
            target: CORE_PROPS_PATH.into(),
        },
        Relationship {
            id: "rId3".into(),
            rel_type: rt::APP_PROPS,
            target: APP_PROPS_PATH.into(),
        },
    ])
}

/// Relationship id of slide `number` within the presentation part.
///
/// `rId1` is the master, so slides start at `rId2`.
fn slide_rel_id(number: usize) -> String {
    format!("rId{}", number + 1)
}

/// `ppt/_rels/presentation.xml.rels`.
pub(crate) fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = Vec::with_capacity(slide_count + 2);
    rels.push(Relationship {
        id: "rId1".into(),
        rel_type: rt::SLIDE_MASTER,
        target: "slideMasters/slideMaster1.xml".into(),
    });
    for number in 1..=slide_count {
        rels.push(Relationship {
            id: slide_rel_id(number),
            rel_type: rt::SLIDE,
            target: format!("slides/slide{}.xml", number),
        });
    }
    rels.push(Relationship {
        id: format!("rId{}", slide_count + 2),
        rel_type: rt::THEME,
        target: "theme/theme1.xml".into(),
    });
    relationships_xml(&rels)
}

/// `ppt/presentation.xml`.
pub(crate) fn presentation_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_DML, NS_REL, NS_PML
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for number in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<p:sldId id="{}" r:id="{}"/>"#,
            FIRST_SLIDE_ID + number - 1,
            slide_rel_id(number)
        );
    }
    xml.push_str("</p:sldIdLst>");
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT
    );
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

/// `ppt/slideMasters/_rels/slideMaster1.xml.rels`.
pub(crate) fn slide_master_rels_xml() -> String {
    let mut rels: Vec<Relationship<'_>> = (1..=LAYOUT_COUNT)
        .map(|layout| Relationship {
            id: format!("rId{}", layout),
            rel_type: rt::SLIDE_LAYOUT,
            target: format!("../slideLayouts/slideLayout{}.xml", layout),
        })
        .collect();
    rels.push(Relationship {
        id: format!("rId{}", LAYOUT_COUNT + 1),
        rel_type: rt::THEME,
        target: "../theme/theme1.xml".into(),
    });
    relationships_xml(&rels)
}

/// Rels for a layout part: just its master.
pub(crate) fn layout_rels_xml() -> String {
    relationships_xml(&[Relationship {
        id: "rId1".into(),
        rel_type: rt::SLIDE_MASTER,
        target: "../slideMasters/slideMaster1.xml".into(),
    }])
}

/// Rels for a slide part: just its layout.
pub(crate) fn slide_rels_xml(layout: usize) -> String {
    relationships_xml(&[Relationship {
        id: "rId1".into(),
        rel_type: rt::SLIDE_LAYOUT,
        target: format!("../slideLayouts/slideLayout{}.xml", layout),
    }])
}

/// `docProps/core.xml`. `title` must already be XML-escaped.
pub(crate) fn core_props_xml(title: &str, creator: &str) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    let _ = write!(xml, "<dc:title>{}</dc:title>", title);
    let _ = write!(xml, "<dc:creator>{}</dc:creator>", creator);
    xml.push_str("</cp:coreProperties>");
    xml
}

/// `docProps/app.xml`.
pub(crate) fn app_props_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(384);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    xml.push_str("<Application>cofounder</Application>");
    let _ = write!(xml, "<Slides>{}</Slides>", slide_count);
    xml.push_str("</Properties>");
    xml
}
