//! Paged summary document. Layout happens in millimetres from the top-left of
//! an A4 page, then gets rendered to PDF.

use super::ExportContext;
use crate::workflows::competency::evidence::{EvidenceError, FlatImage};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

const MARGIN_X: f32 = 20.0;
const WORKER_INDENT_X: f32 = 25.0;
const PAGE_TOP: f32 = 20.0;
const ROLES_START: f32 = 60.0;
const ROLE_HEADING_ADVANCE: f32 = 7.0;
const WORKER_LINE_ADVANCE: f32 = 6.0;
const ROLE_GAP: f32 = 5.0;
/// Past this offset the next line starts a new page.
pub const PAGE_BREAK_AT: f32 = 270.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentItem {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        text: String,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: FlatImage,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub items: Vec<DocumentItem>,
}

impl DocumentPage {
    fn text(&mut self, x: f32, y: f32, size: f32, weight: FontWeight, text: String) {
        self.items.push(DocumentItem::Text {
            x,
            y,
            size,
            weight,
            text,
        });
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Text { text, .. } => Some(text.as_str()),
            DocumentItem::Image { .. } => None,
        })
    }

    pub fn has_image(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, DocumentItem::Image { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<DocumentPage>,
}

impl DocumentLayout {
    pub fn build(ctx: &ExportContext<'_>) -> Result<Self, EvidenceError> {
        let mut pages = vec![DocumentPage::default()];
        let timestamp = ctx.timestamp();
        let sub_unit = ctx.selection.sub_unit.as_deref().unwrap_or_default();

        let first = &mut pages[0];
        first.text(
            MARGIN_X,
            20.0,
            TITLE_SIZE,
            FontWeight::Regular,
            "Competency Evaluation Summary".to_string(),
        );
        first.text(
            MARGIN_X,
            30.0,
            BODY_SIZE,
            FontWeight::Regular,
            format!("Evaluator: {}", ctx.identity.display_name),
        );
        first.text(
            MARGIN_X,
            37.0,
            BODY_SIZE,
            FontWeight::Regular,
            format!("Sub-unit: {sub_unit}"),
        );
        first.text(
            MARGIN_X,
            44.0,
            BODY_SIZE,
            FontWeight::Regular,
            format!("Date: {timestamp}"),
        );

        let mut y = ROLES_START;
        for group in ctx.groups.iter() {
            current(&mut pages).text(
                MARGIN_X,
                y,
                BODY_SIZE,
                FontWeight::Bold,
                format!("Role: {}", group.role),
            );
            y += ROLE_HEADING_ADVANCE;

            for summary in ctx.scores.summarize_group(group) {
                current(&mut pages).text(
                    WORKER_INDENT_X,
                    y,
                    BODY_SIZE,
                    FontWeight::Regular,
                    format!(
                        "- {}: {}% ({})",
                        summary.worker, summary.percentage, summary.status_label
                    ),
                );
                y += WORKER_LINE_ADVANCE;
                if y > PAGE_BREAK_AT {
                    pages.push(DocumentPage::default());
                    y = PAGE_TOP;
                }
            }
            y += ROLE_GAP;
        }

        let mut evidence = DocumentPage::default();
        evidence.text(
            MARGIN_X,
            20.0,
            BODY_SIZE,
            FontWeight::Regular,
            "Signature evidence:".to_string(),
        );
        evidence.items.push(DocumentItem::Image {
            x: MARGIN_X,
            y: 30.0,
            width: 60.0,
            height: 30.0,
            image: ctx.evidence.signature.to_rgb_on_white()?,
        });
        evidence.text(
            MARGIN_X,
            70.0,
            BODY_SIZE,
            FontWeight::Regular,
            format!("Name: {}", ctx.evidence.full_name),
        );
        pages.push(evidence);

        Ok(Self { pages })
    }

    pub fn render_pdf(&self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);
        let mut next_id = 5;
        let mut alloc = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let page_size = Rect::new(
            0.0,
            0.0,
            PAGE_WIDTH_MM * PT_PER_MM,
            PAGE_HEIGHT_MM * PT_PER_MM,
        );
        let mut page_ids = Vec::with_capacity(self.pages.len());

        for page in &self.pages {
            let page_id = alloc();
            let content_id = alloc();
            page_ids.push(page_id);

            let mut content = Content::new();
            let mut images = Vec::new();
            for item in &page.items {
                match item {
                    DocumentItem::Text {
                        x,
                        y,
                        size,
                        weight,
                        text,
                    } => {
                        let font = match weight {
                            FontWeight::Regular => Name(b"F1"),
                            FontWeight::Bold => Name(b"F2"),
                        };
                        let encoded = win_ansi(text);
                        content
                            .begin_text()
                            .set_font(font, *size)
                            .next_line(x * PT_PER_MM, to_pdf_y(*y))
                            .show(Str(&encoded))
                            .end_text();
                    }
                    DocumentItem::Image {
                        x,
                        y,
                        width,
                        height,
                        image,
                    } => {
                        let image_id = alloc();
                        let name = format!("Im{}", images.len() + 1);
                        content
                            .save_state()
                            .transform([
                                width * PT_PER_MM,
                                0.0,
                                0.0,
                                height * PT_PER_MM,
                                x * PT_PER_MM,
                                to_pdf_y(y + height),
                            ])
                            .x_object(Name(name.as_bytes()))
                            .restore_state();
                        images.push((name, image_id, image));
                    }
                }
            }

            for (_, image_id, image) in &images {
                let mut xobject = pdf.image_xobject(*image_id, &image.pixels);
                xobject.width(image.width as i32);
                xobject.height(image.height as i32);
                xobject.color_space().device_rgb();
                xobject.bits_per_component(8);
                xobject.finish();
            }

            let mut writer = pdf.page(page_id);
            writer.media_box(page_size);
            writer.parent(tree_id);
            writer.contents(content_id);
            let mut resources = writer.resources();
            resources
                .fonts()
                .pair(Name(b"F1"), regular_id)
                .pair(Name(b"F2"), bold_id);
            if !images.is_empty() {
                let mut x_objects = resources.x_objects();
                for (name, image_id, _) in &images {
                    x_objects.pair(Name(name.as_bytes()), *image_id);
                }
            }
            resources.finish();
            writer.finish();

            pdf.stream(content_id, &content.finish());
        }

        let count = page_ids.len() as i32;
        pdf.pages(tree_id).kids(page_ids).count(count);
        pdf.finish()
    }
}

fn current(pages: &mut [DocumentPage]) -> &mut DocumentPage {
    let last = pages.len() - 1;
    &mut pages[last]
}

fn to_pdf_y(y_mm: f32) -> f32 {
    (PAGE_HEIGHT_MM - y_mm) * PT_PER_MM
}

/// Latin-1 maps onto WinAnsi for the accented letters the rosters use;
/// anything else becomes '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            code @ 0x20..=0x7e => code as u8,
            code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}
