use async_trait::async_trait;
use onboard::errors::ModelError;
use onboard::providers::ai::GenerativeModels;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock Model Provider ---

/// A programmable stand-in for a hosted model service.
///
/// Each model identifier can be programmed to answer with text or to fail. Models with no
/// programmed outcome fail with HTTP 404, which mirrors an unknown model name.
#[derive(Clone, Debug, Default)]
pub struct MockModels {
    outcomes: Arc<Mutex<HashMap<String, Result<String, u16>>>>,
    listing: Arc<Mutex<Option<Vec<String>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    list_calls: Arc<Mutex<usize>>,
}

impl MockModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs `model` to answer with `text`.
    pub fn succeed(&self, model: &str, text: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(model.to_string(), Ok(text.to_string()));
    }

    /// Programs `model` to fail with the given HTTP status.
    pub fn fail(&self, model: &str, status: u16) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(model.to_string(), Err(status));
    }

    /// Programs the listing call. Without this the listing call fails.
    pub fn set_listing(&self, models: &[&str]) {
        *self.listing.lock().unwrap() = Some(models.iter().map(|m| m.to_string()).collect());
    }

    /// The `(model, prompt)` pairs received, in call order.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// The model identifiers received, in call order.
    pub fn called_models(&self) -> Vec<String> {
        self.get_calls().into_iter().map(|(model, _)| model).collect()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl GenerativeModels for MockModels {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));

        match self.outcomes.lock().unwrap().get(model) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(status)) => Err(ModelError::Api {
                status: *status,
                body: format!("MockModels: '{model}' programmed to fail"),
            }),
            None => Err(ModelError::Api {
                status: 404,
                body: format!("MockModels: model '{model}' not found"),
            }),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        *self.list_calls.lock().unwrap() += 1;
        self.listing.lock().unwrap().clone().ok_or(ModelError::Api {
            status: 500,
            body: "MockModels: listing unavailable".to_string(),
        })
    }
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
    use std::collections::HashMap;

    /// A piece of text drawn at `(x, y)` in PDF user space (origin bottom-left).
    #[derive(Debug, Clone)]
    pub struct PlacedText {
        pub x: f32,
        pub y: f32,
        pub text: String,
    }

    impl PlacedText {
        pub fn new(x: f32, y: f32, text: &str) -> Self {
            Self {
                x,
                y,
                text: text.to_string(),
            }
        }
    }

    /// How the generated document stores its text.
    enum TextFont {
        /// Helvetica with literal strings.
        Helvetica,
        /// A Type0 Identity-H font with two-byte codes assigned per distinct character and
        /// a ToUnicode CMap mapping them back.
        Cjk(HashMap<char, u16>),
    }

    impl TextFont {
        fn cjk(pages: &[Vec<PlacedText>]) -> Self {
            let mut codes = HashMap::new();
            for placed in pages.iter().flatten() {
                for ch in placed.text.chars() {
                    let next = codes.len() as u16 + 1;
                    codes.entry(ch).or_insert(next);
                }
            }
            TextFont::Cjk(codes)
        }

        fn add_to(&self, doc: &mut Document) -> ObjectId {
            match self {
                TextFont::Helvetica => doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                }),
                TextFont::Cjk(codes) => {
                    let descriptor_id = doc.add_object(dictionary! {
                        "Type" => "FontDescriptor",
                        "FontName" => "TestCJK",
                        "Flags" => 4,
                        "FontBBox" => vec![0.into(), (-200).into(), 1000.into(), 900.into()],
                        "ItalicAngle" => 0,
                        "Ascent" => 880,
                        "Descent" => -120,
                        "CapHeight" => 700,
                        "StemV" => 80,
                    });
                    let descendant_id = doc.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "CIDFontType2",
                        "BaseFont" => "TestCJK",
                        "CIDSystemInfo" => dictionary! {
                            "Registry" => Object::string_literal("Adobe"),
                            "Ordering" => Object::string_literal("Identity"),
                            "Supplement" => 0,
                        },
                        "FontDescriptor" => descriptor_id,
                        "DW" => 1000,
                        "W" => Vec::<Object>::new(),
                        "CIDToGIDMap" => "Identity",
                    });
                    let cmap_id =
                        doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(codes).into_bytes()));
                    doc.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type0",
                        "BaseFont" => "TestCJK",
                        "Encoding" => "Identity-H",
                        "DescendantFonts" => vec![descendant_id.into()],
                        "ToUnicode" => cmap_id,
                    })
                }
            }
        }

        fn encode(&self, text: &str) -> Object {
            match self {
                TextFont::Helvetica => Object::string_literal(text),
                TextFont::Cjk(codes) => {
                    let bytes = text
                        .chars()
                        .filter_map(|ch| codes.get(&ch))
                        .flat_map(|code| code.to_be_bytes())
                        .collect();
                    Object::String(bytes, StringFormat::Hexadecimal)
                }
            }
        }
    }

    fn to_unicode_cmap(codes: &HashMap<char, u16>) -> String {
        let mut entries: Vec<(u16, char)> = codes.iter().map(|(&ch, &code)| (code, ch)).collect();
        entries.sort();

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
             /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        // A bfchar block holds at most 100 entries.
        for chunk in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (code, ch) in chunk {
                let unicode: String = ch
                    .encode_utf16(&mut [0; 2])
                    .iter()
                    .map(|unit| format!("{unit:04X}"))
                    .collect();
                cmap.push_str(&format!("<{code:04X}> <{unicode}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }

    fn build_pdf(
        pages: &[Vec<PlacedText>],
        font: &TextFont,
        dangling_contents: Option<usize>,
    ) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = font.add_to(&mut doc);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for (index, texts) in pages.iter().enumerate() {
            let mut operations = Vec::new();
            for placed in texts {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![placed.x.into(), placed.y.into()],
                ));
                operations.push(Operation::new("Tj", vec![font.encode(&placed.text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let contents: Object = if dangling_contents == Some(index) {
                // Points past every object in the file.
                Object::Reference((9_999, 0))
            } else {
                let content = Content { operations };
                doc.add_object(Stream::new(dictionary! {}, content.encode()?))
                    .into()
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn text_pages(pages: &[&str]) -> Vec<Vec<PlacedText>> {
        pages
            .iter()
            .map(|text| {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![PlacedText::new(72.0, 760.0, text)]
                }
            })
            .collect()
    }

    /// Generates a PDF with one page per entry, each page drawing its texts in Helvetica
    /// 12pt at absolute positions.
    pub fn generate_test_pdf(pages: &[Vec<PlacedText>]) -> Result<Vec<u8>> {
        build_pdf(pages, &TextFont::Helvetica, None)
    }

    /// Generates a PDF with one text line per page; an empty string yields a blank page.
    pub fn generate_text_pdf(pages: &[&str]) -> Result<Vec<u8>> {
        generate_test_pdf(&text_pages(pages))
    }

    /// Like [`generate_test_pdf`], but draws every text with a Type0 Identity-H font whose
    /// strings are two-byte glyph codes, readable only through its ToUnicode CMap.
    pub fn generate_cjk_pdf(pages: &[Vec<PlacedText>]) -> Result<Vec<u8>> {
        build_pdf(pages, &TextFont::cjk(pages), None)
    }

    /// Like [`generate_text_pdf`], with the Type0 font of [`generate_cjk_pdf`].
    pub fn generate_cjk_text_pdf(pages: &[&str]) -> Result<Vec<u8>> {
        generate_cjk_pdf(&text_pages(pages))
    }

    /// Like [`generate_text_pdf`], but the page at `broken_page` (0-indexed) has its
    /// `Contents` pointing at an object that does not exist.
    pub fn generate_text_pdf_with_broken_page(pages: &[&str], broken_page: usize) -> Result<Vec<u8>> {
        build_pdf(&text_pages(pages), &TextFont::Helvetica, Some(broken_page))
    }

    /// Lays out `rows` as a grid starting at `(left, top)`, one row every 20pt and one
    /// column every 150pt.
    pub fn grid(left: f32, top: f32, rows: &[&[&str]]) -> Vec<PlacedText> {
        let mut placed = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                placed.push(PlacedText::new(
                    left + c as f32 * 150.0,
                    top - r as f32 * 20.0,
                    cell,
                ));
            }
        }
        placed
    }
}
