//! HTML generation for the numbered paper view.

use neuink_model::{
    Attachment, BilingualInlines, Block, BlockKind, Inline, PaperContent, Reference, Section,
};
use pulldown_cmark_escape::{FmtWriter, StrWrite, escape_href, escape_html};

use crate::RenderState;

struct HtmlWriter<'a, W> {
    writer: W,
    state: &'a RenderState<'a>,
    /// Whether or not the last write wrote a newline.
    end_newline: bool,
}

impl<'a, W: StrWrite> HtmlWriter<'a, W> {
    fn new(writer: W, state: &'a RenderState<'a>) -> Self {
        Self {
            writer,
            state,
            end_newline: true,
        }
    }

    /// Writes a buffer, and tracks whether or not a newline was written.
    #[inline]
    fn write(&mut self, s: &str) -> Result<(), W::Error> {
        self.writer.write_str(s)?;
        if !s.is_empty() {
            self.end_newline = s.ends_with('\n');
        }
        Ok(())
    }

    #[inline]
    fn write_newline(&mut self) -> Result<(), W::Error> {
        self.end_newline = true;
        self.writer.write_str("\n")
    }

    fn run(mut self, doc: &PaperContent) -> Result<(), W::Error> {
        self.write("<article class=\"paper\">")?;
        self.write_newline()?;
        self.header(doc)?;
        for section in &doc.sections {
            self.section(section, 0)?;
        }
        if !doc.references.is_empty() {
            self.references(&doc.references)?;
        }
        if !doc.attachments.is_empty() {
            self.attachments(&doc.attachments)?;
        }
        self.write("</article>")?;
        self.write_newline()
    }

    fn header(&mut self, doc: &PaperContent) -> Result<(), W::Error> {
        self.write("<header>")?;
        self.write("<h1>")?;
        self.bilingual_plain(&doc.metadata.title.en, &doc.metadata.title.zh)?;
        self.write("</h1>")?;
        self.write_newline()?;

        if !doc.metadata.authors.is_empty() {
            self.write("<p class=\"authors\">")?;
            for (i, author) in doc.metadata.authors.iter().enumerate() {
                if i > 0 {
                    self.write(", ")?;
                }
                escape_html(&mut self.writer, author)?;
            }
            self.write("</p>")?;
            self.write_newline()?;
        }

        if !doc.abstract_text.is_empty() {
            self.write("<section class=\"abstract\">")?;
            self.write("<p>")?;
            self.bilingual_plain(&doc.abstract_text.en, &doc.abstract_text.zh)?;
            self.write("</p>")?;
            self.write("</section>")?;
            self.write_newline()?;
        }

        if !doc.keywords.is_empty() {
            self.write("<p class=\"keywords\">")?;
            for (i, keyword) in doc.keywords.iter().enumerate() {
                if i > 0 {
                    self.write("; ")?;
                }
                escape_html(&mut self.writer, keyword)?;
            }
            self.write("</p>")?;
            self.write_newline()?;
        }

        self.write("</header>")?;
        self.write_newline()
    }

    fn section(&mut self, section: &Section, depth: usize) -> Result<(), W::Error> {
        self.write("<section id=\"")?;
        escape_html(&mut self.writer, &section.id)?;
        self.write("\"")?;
        if let Some(number) = &section.number {
            self.write(" data-number=\"")?;
            escape_html(&mut self.writer, number)?;
            self.write("\"")?;
        }
        if self.state.is_editing(&section.id) {
            self.write(" data-editing=\"true\"")?;
        }
        self.write(">")?;
        self.write_newline()?;

        // h2 at the top level, deeper levels capped at h6.
        let heading = (depth + 2).min(6);
        self.write(&format!("<h{heading}>"))?;
        if let Some(number) = &section.number {
            escape_html(&mut self.writer, number)?;
            self.write(" ")?;
        }
        self.bilingual_plain(&section.title.en, &section.title.zh)?;
        self.write(&format!("</h{heading}>"))?;
        self.write_newline()?;

        for (i, block) in section.content.iter().enumerate() {
            self.block(block, i == 0, i + 1 == section.content.len())?;
        }
        for sub in &section.subsections {
            self.section(sub, depth + 1)?;
        }

        self.write("</section>")?;
        self.write_newline()
    }

    fn block(&mut self, block: &Block, first: bool, last: bool) -> Result<(), W::Error> {
        self.write("<div class=\"block block-")?;
        self.write(block.kind.type_tag())?;
        if self.state.is_highlighted(&block.id) {
            self.write(" search-hit")?;
        }
        if self.state.is_editing(&block.id) {
            self.write(" editing")?;
        }
        self.write("\" id=\"")?;
        escape_html(&mut self.writer, &block.id)?;
        self.write("\"")?;
        // Boundary flags let the host disable move-up/move-down at edges.
        if first {
            self.write(" data-first=\"true\"")?;
        }
        if last {
            self.write(" data-last=\"true\"")?;
        }
        self.write(">")?;
        self.write_newline()?;

        self.block_body(block)?;

        if self.state.is_parse_target(&block.id) {
            // The inline text-parsing editor mounts directly after the block.
            self.write("<div class=\"parse-editor\" data-anchor=\"")?;
            escape_html(&mut self.writer, &block.id)?;
            self.write("\"></div>")?;
            self.write_newline()?;
        }

        self.write("</div>")?;
        self.write_newline()
    }

    fn block_body(&mut self, block: &Block) -> Result<(), W::Error> {
        match &block.kind {
            BlockKind::Paragraph { content } => {
                self.write("<p>")?;
                self.bilingual(content)?;
                self.write("</p>")?;
                self.write_newline()
            }
            BlockKind::Heading { level, content } => {
                let level = (*level).clamp(2, 6);
                self.write(&format!("<h{level}>"))?;
                self.bilingual(content)?;
                self.write(&format!("</h{level}>"))?;
                self.write_newline()
            }
            BlockKind::Math { latex, .. } => {
                self.write("<span class=\"math math-display\"")?;
                if let Some(number) = block.number {
                    self.write(&format!(" data-number=\"{number}\""))?;
                }
                self.write(">")?;
                escape_html(&mut self.writer, latex)?;
                self.write("</span>")?;
                if let Some(number) = block.number {
                    self.write(&format!("<span class=\"eq-number\">({number})</span>"))?;
                }
                self.write_newline()
            }
            BlockKind::Figure { src, caption } => {
                self.write("<figure><img src=\"")?;
                escape_href(&mut self.writer, src)?;
                self.write("\" /><figcaption>")?;
                if let Some(number) = block.number {
                    self.write(&format!("Figure {number}: "))?;
                }
                self.bilingual(caption)?;
                self.write("</figcaption></figure>")?;
                self.write_newline()
            }
            BlockKind::Table {
                caption,
                header,
                rows,
            } => {
                self.write("<table><caption>")?;
                if let Some(number) = block.number {
                    self.write(&format!("Table {number}: "))?;
                }
                self.bilingual(caption)?;
                self.write("</caption>")?;
                if !header.is_empty() {
                    self.write("<thead><tr>")?;
                    for cell in header {
                        self.write("<th>")?;
                        self.bilingual(cell)?;
                        self.write("</th>")?;
                    }
                    self.write("</tr></thead>")?;
                }
                self.write("<tbody>")?;
                for row in rows {
                    self.write("<tr>")?;
                    for cell in row {
                        self.write("<td>")?;
                        self.bilingual(cell)?;
                        self.write("</td>")?;
                    }
                    self.write("</tr>")?;
                }
                self.write("</tbody></table>")?;
                self.write_newline()
            }
            BlockKind::Code { language, code } => {
                self.write("<pre><code")?;
                if let Some(language) = language {
                    self.write(" class=\"language-")?;
                    escape_html(&mut self.writer, language)?;
                    self.write("\"")?;
                }
                self.write(">")?;
                escape_html(&mut self.writer, code)?;
                self.write("</code></pre>")?;
                self.write_newline()
            }
            BlockKind::OrderedList { items } => self.list("ol", items),
            BlockKind::UnorderedList { items } => self.list("ul", items),
            BlockKind::Quote { content } => {
                self.write("<blockquote><p>")?;
                self.bilingual(content)?;
                self.write("</p></blockquote>")?;
                self.write_newline()
            }
            BlockKind::Divider => {
                self.write("<hr />")?;
                self.write_newline()
            }
        }
    }

    fn list(&mut self, tag: &str, items: &[BilingualInlines]) -> Result<(), W::Error> {
        self.write(&format!("<{tag}>"))?;
        self.write_newline()?;
        for item in items {
            self.write("<li>")?;
            self.bilingual(item)?;
            self.write("</li>")?;
            self.write_newline()?;
        }
        self.write(&format!("</{tag}>"))?;
        self.write_newline()
    }

    /// Rich bilingual content, filtered by the display-language setting.
    fn bilingual(&mut self, content: &BilingualInlines) -> Result<(), W::Error> {
        if self.state.language.shows_english() && !content.en.is_empty() {
            self.write("<span lang=\"en\">")?;
            self.inlines(&content.en)?;
            self.write("</span>")?;
        }
        if self.state.language.shows_chinese() && !content.zh.is_empty() {
            self.write("<span lang=\"zh\">")?;
            self.inlines(&content.zh)?;
            self.write("</span>")?;
        }
        Ok(())
    }

    /// Plain bilingual text (titles, abstract), same language filtering.
    fn bilingual_plain(&mut self, en: &str, zh: &str) -> Result<(), W::Error> {
        if self.state.language.shows_english() && !en.is_empty() {
            self.write("<span lang=\"en\">")?;
            escape_html(&mut self.writer, en)?;
            self.write("</span>")?;
        }
        if self.state.language.shows_chinese() && !zh.is_empty() {
            self.write("<span lang=\"zh\">")?;
            escape_html(&mut self.writer, zh)?;
            self.write("</span>")?;
        }
        Ok(())
    }

    fn inlines(&mut self, nodes: &[Inline]) -> Result<(), W::Error> {
        for node in nodes {
            match node {
                Inline::Text { text } => escape_html(&mut self.writer, text)?,
                Inline::Link { text, href } => {
                    self.write("<a href=\"")?;
                    escape_href(&mut self.writer, href)?;
                    self.write("\">")?;
                    escape_html(&mut self.writer, text)?;
                    self.write("</a>")?;
                }
                Inline::InlineMath { latex } => {
                    self.write("<span class=\"math math-inline\">")?;
                    escape_html(&mut self.writer, latex)?;
                    self.write("</span>")?;
                }
                Inline::Citation { key, text } => {
                    self.write("<cite data-key=\"")?;
                    escape_html(&mut self.writer, key)?;
                    self.write("\">")?;
                    escape_html(&mut self.writer, text)?;
                    self.write("</cite>")?;
                }
                Inline::FigureRef { target, text }
                | Inline::TableRef { target, text }
                | Inline::SectionRef { target, text }
                | Inline::EquationRef { target, text } => {
                    self.write("<a class=\"xref\" href=\"#")?;
                    escape_href(&mut self.writer, target)?;
                    self.write("\">")?;
                    escape_html(&mut self.writer, text)?;
                    self.write("</a>")?;
                }
                Inline::Footnote { text } => {
                    self.write("<sup class=\"footnote\">")?;
                    escape_html(&mut self.writer, text)?;
                    self.write("</sup>")?;
                }
            }
        }
        Ok(())
    }

    fn references(&mut self, references: &[Reference]) -> Result<(), W::Error> {
        self.write("<section class=\"references\">")?;
        self.write_newline()?;
        self.write("<h2>References</h2>")?;
        self.write_newline()?;
        self.write("<ol>")?;
        self.write_newline()?;
        for reference in references {
            self.write("<li id=\"")?;
            escape_html(&mut self.writer, &reference.id)?;
            self.write("\">")?;
            for (i, author) in reference.authors.iter().enumerate() {
                if i > 0 {
                    self.write(", ")?;
                }
                escape_html(&mut self.writer, author)?;
            }
            if !reference.authors.is_empty() {
                self.write(", ")?;
            }
            escape_html(&mut self.writer, &reference.title)?;
            if let Some(publication) = &reference.publication {
                self.write(", <i>")?;
                escape_html(&mut self.writer, publication)?;
                self.write("</i>")?;
            }
            if let Some(year) = reference.year {
                self.write(&format!(", {year}"))?;
            }
            if let Some(doi) = &reference.doi {
                self.write(" doi:")?;
                escape_html(&mut self.writer, doi)?;
            }
            self.write(".</li>")?;
            self.write_newline()?;
        }
        self.write("</ol>")?;
        self.write_newline()?;
        self.write("</section>")?;
        self.write_newline()
    }

    fn attachments(&mut self, attachments: &[Attachment]) -> Result<(), W::Error> {
        self.write("<section class=\"attachments\"><ul>")?;
        self.write_newline()?;
        for attachment in attachments {
            self.write("<li><a href=\"")?;
            escape_href(&mut self.writer, &attachment.url)?;
            self.write("\">")?;
            escape_html(&mut self.writer, &attachment.name)?;
            self.write("</a></li>")?;
            self.write_newline()?;
        }
        self.write("</ul></section>")?;
        self.write_newline()
    }
}

/// Render the numbered document and push the HTML to a `String`.
pub fn push_html(s: &mut String, doc: &PaperContent, state: &RenderState<'_>) {
    write_html_fmt(s, doc, state).unwrap()
}

/// Render the numbered document into a Unicode-accepting buffer or stream.
pub fn write_html_fmt<W>(writer: W, doc: &PaperContent, state: &RenderState<'_>) -> core::fmt::Result
where
    W: core::fmt::Write,
{
    HtmlWriter::new(FmtWriter(writer), state).run(doc)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use neuink_editor::number_document;
    use neuink_model::{
        BilingualInlines, BilingualText, Block, BlockKind, LanguageMode, PaperContent, Section,
        SmolStr,
    };

    use crate::{RenderState, render_paper};

    fn para(en: &str, zh: &str) -> Arc<Block> {
        Arc::new(Block::new(BlockKind::Paragraph {
            content: BilingualInlines::text(en, zh),
        }))
    }

    fn figure(caption: &str) -> Arc<Block> {
        Arc::new(Block::new(BlockKind::Figure {
            src: "plot.png".into(),
            caption: BilingualInlines::text(caption, ""),
        }))
    }

    fn make_doc() -> (PaperContent, Vec<SmolStr>) {
        let blocks = vec![para("first", "第一"), figure("results"), para("last", "")];
        let ids: Vec<_> = blocks.iter().map(|b| b.id.clone()).collect();
        let mut section = Section::new(BilingualText::new("Results", "结果"));
        section.content = blocks;
        let doc = PaperContent {
            sections: vec![Arc::new(section)],
            ..Default::default()
        };
        (number_document(&doc), ids)
    }

    #[test]
    fn test_boundary_flags_only_at_edges() {
        let (doc, ids) = make_doc();
        let html = render_paper(&doc, &RenderState::default());

        let first = format!("id=\"{}\" data-first=\"true\"", ids[0]);
        let last = format!("id=\"{}\" data-last=\"true\"", ids[2]);
        assert!(html.contains(&first));
        assert!(html.contains(&last));
        // The middle block carries neither flag.
        assert_eq!(html.matches("data-first").count(), 1);
        assert_eq!(html.matches("data-last").count(), 1);
    }

    #[test]
    fn test_section_and_figure_numbers() {
        let (doc, _) = make_doc();
        let html = render_paper(&doc, &RenderState::default());
        assert!(html.contains("data-number=\"1\""));
        assert!(html.contains("Figure 1: "));
    }

    #[test]
    fn test_highlight_and_editing_markers() {
        let (doc, ids) = make_doc();
        let highlights = vec![ids[0].clone()];
        let state = RenderState {
            highlights: &highlights,
            editing: Some(ids[2].as_str()),
            ..Default::default()
        };
        let html = render_paper(&doc, &state);
        assert!(html.contains("block-paragraph search-hit"));
        assert!(html.contains("block-paragraph editing"));
    }

    #[test]
    fn test_parse_target_yields_inline_editor_mount() {
        let (doc, ids) = make_doc();
        let state = RenderState {
            parse_target: Some(ids[1].as_str()),
            ..Default::default()
        };
        let html = render_paper(&doc, &state);
        assert!(html.contains("parse-editor"));

        // An active edit target suppresses the parse editor.
        let state = RenderState {
            parse_target: Some(ids[1].as_str()),
            editing: Some(ids[0].as_str()),
            ..Default::default()
        };
        let html = render_paper(&doc, &state);
        assert!(!html.contains("parse-editor"));
    }

    #[test]
    fn test_language_mode_filters_variants() {
        let (doc, _) = make_doc();
        let state = RenderState {
            language: LanguageMode::EnglishOnly,
            ..Default::default()
        };
        let html = render_paper(&doc, &state);
        assert!(html.contains("first"));
        assert!(!html.contains("第一"));
    }

    #[test]
    fn test_text_is_escaped() {
        let block = para("a < b & c", "");
        let block_id = block.id.clone();
        let mut section = Section::new(BilingualText::english("Escaping"));
        section.content = vec![block];
        let doc = PaperContent {
            sections: vec![Arc::new(section)],
            ..Default::default()
        };
        let html = render_paper(&number_document(&doc), &RenderState::default());
        assert!(html.contains("a &lt; b &amp; c"));
        assert!(html.contains(block_id.as_str()));
    }
}
