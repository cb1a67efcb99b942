//! Turns [`SiteContent`] into a document.
//!
//! Every content section goes through [`render_section`]; only the header,
//! hero and contact blocks have their own shape. Section bodies are reveal
//! groups and their headings, paragraphs, points, cards and actions are the
//! reveal items, in that order.

use kavela_dom::html::render_html_with_style;
use kavela_dom::markers::{REVEAL_GROUP, REVEAL_ITEM};
use kavela_dom::{Document, Element, NodeId, Result};
use tracing::debug;

use crate::content::{Arrangement, Button, ButtonStyle, Card, ContactInfo, Section, SiteContent, Tone};
use crate::theme::{CARD_BG, NAVY_BG, NAVY_BG_ALT};

const HEADER_HEIGHT_PX: u32 = 96;

fn group(el: Element) -> Element {
    el.with_attr(REVEAL_GROUP, "")
}

fn item(el: Element) -> Element {
    el.with_attr(REVEAL_ITEM, "")
}

fn background(tone: Tone) -> &'static str {
    match tone {
        Tone::Base => NAVY_BG,
        Tone::Alt => NAVY_BG_ALT,
    }
}

/// Build the full page document for `content`. `year` goes in the footer.
pub fn build_document(content: &SiteContent, year: i32) -> Result<Document> {
    let mut doc = Document::new(
        Element::new("body").with_attr("style", format!("background-color: {NAVY_BG}")),
    );
    let body = doc.root();
    render_header(&mut doc, body, content)?;
    let main = doc.append(body, Element::new("main"))?;
    render_hero(&mut doc, main, content)?;
    for section in content.sections {
        render_section(&mut doc, main, section)?;
    }
    render_contact(&mut doc, main, &content.contact, year)?;
    debug!(nodes = doc.len(), sections = content.sections.len() + 2, "site document built");
    Ok(doc)
}

/// Build the document and serialize it as a standalone page.
pub fn render_page(content: &SiteContent, year: i32, stylesheet: &str) -> Result<String> {
    let doc = build_document(content, year)?;
    Ok(render_html_with_style(&doc, content.title, stylesheet))
}

fn render_button(doc: &mut Document, parent: NodeId, button: &Button) -> Result<NodeId> {
    let class = match button.style {
        ButtonStyle::Primary => "button button-primary",
        ButtonStyle::Outline => "button button-outline",
    };
    let el = Element::new("a")
        .with_attr("href", button.href)
        .with_class(class)
        .with_attr("style", "padding: 12px 20px")
        .with_text(button.label);
    doc.append(parent, el)
}

fn render_header(doc: &mut Document, parent: NodeId, content: &SiteContent) -> Result<NodeId> {
    let header = doc.append(
        parent,
        Element::new("header")
            .with_class("site-header")
            .with_attr("style", format!("height: {HEADER_HEIGHT_PX}px; padding: 0px 16px")),
    )?;
    let nav = doc.append(header, Element::new("nav").with_class("container"))?;
    let home = doc.append(
        nav,
        Element::new("a")
            .with_attr("href", content.home)
            .with_class("logo"),
    )?;
    doc.append(
        home,
        Element::new("img")
            .with_attr("src", content.logo_src)
            .with_attr("alt", content.brand),
    )?;
    let links = doc.append(nav, Element::new("ul").with_class("nav-links"))?;
    for link in content.nav {
        let entry = doc.append(links, Element::new("li"))?;
        doc.append(
            entry,
            Element::new("a")
                .with_attr("href", link.href)
                .with_text(link.label),
        )?;
    }
    render_button(doc, nav, &content.header_action)?;
    Ok(header)
}

fn render_hero(doc: &mut Document, parent: NodeId, content: &SiteContent) -> Result<NodeId> {
    let hero = &content.hero;
    let section = doc.append(
        parent,
        Element::new("section")
            .with_id(content.hero_id)
            .with_class("hero")
            .with_attr(
                "style",
                format!("min-height: 92vh; padding: 80px 16px 48px 16px; background-color: {NAVY_BG}"),
            ),
    )?;
    let body = doc.append(
        section,
        group(Element::new("div").with_class("container").with_attr("style", "gap: 24px")),
    )?;
    doc.append(body, item(Element::new("p").with_class("eyebrow").with_text(hero.eyebrow)))?;
    let headline = doc.append(body, item(Element::new("h1").with_text(hero.headline)))?;
    doc.append(
        headline,
        Element::new("span")
            .with_class("highlight")
            .with_text(hero.highlight),
    )?;
    doc.append(body, item(Element::new("p").with_class("lede muted").with_text(hero.lede)))?;
    let actions = doc.append(
        body,
        item(Element::new("div").with_class("actions").with_attr("style", "gap: 12px")),
    )?;
    for action in hero.actions {
        render_button(doc, actions, action)?;
    }
    let cue = doc.append(section, Element::new("div").with_class("scroll-cue muted"))?;
    doc.append(
        cue,
        Element::new("a")
            .with_attr("href", hero.scroll_cue.href)
            .with_text(hero.scroll_cue.label),
    )?;
    Ok(section)
}

/// Render one content section: a reveal group holding the heading,
/// paragraphs, points, cards and action as items.
pub fn render_section(doc: &mut Document, parent: NodeId, section: &Section) -> Result<NodeId> {
    let mut el = Element::new("section").with_class("section").with_attr(
        "style",
        format!("padding: 96px 16px; background-color: {}", background(section.tone)),
    );
    if let Some(id) = section.id {
        el = el.with_id(id);
    }
    let node = doc.append(parent, el)?;
    let container = doc.append(
        node,
        group(Element::new("div").with_class("container").with_attr("style", "gap: 40px")),
    )?;

    let (copy, align) = match section.arrangement {
        Arrangement::Split => (doc.append(container, Element::new("div").with_class("copy"))?, "text-left"),
        Arrangement::Grid | Arrangement::Banner => (container, "text-center"),
    };
    doc.append(
        copy,
        item(Element::new("h2").with_class(align).with_text(section.heading)),
    )?;
    for paragraph in section.paragraphs {
        doc.append(
            copy,
            item(Element::new("p").with_class(&format!("muted {align}")).with_text(*paragraph)),
        )?;
    }
    if !section.points.is_empty() {
        let list = doc.append(
            copy,
            Element::new("ul").with_class("points").with_attr("style", "gap: 16px"),
        )?;
        for point in section.points {
            let entry = doc.append(list, item(Element::new("li")))?;
            doc.append(entry, Element::new("span").with_class("bullet"))?;
            doc.append(entry, Element::new("p").with_class("muted").with_text(*point))?;
        }
    }
    if !section.cards.is_empty() {
        let class = match section.arrangement {
            Arrangement::Grid => "cards cards-row",
            _ => "cards",
        };
        let row = doc.append(
            container,
            Element::new("div").with_class(class).with_attr("style", "gap: 24px"),
        )?;
        for card in section.cards {
            render_card(doc, row, card)?;
        }
    }
    if let Some(action) = &section.action {
        let wrap = doc.append(container, item(Element::new("div").with_class("actions")))?;
        render_button(doc, wrap, action)?;
    }
    Ok(node)
}

fn render_card(doc: &mut Document, parent: NodeId, card: &Card) -> Result<NodeId> {
    let node = doc.append(
        parent,
        item(
            Element::new("div")
                .with_class("card")
                .with_attr("style", format!("padding: 24px; background-color: {CARD_BG}")),
        ),
    )?;
    if card.icon {
        doc.append(
            node,
            Element::new("div")
                .with_class("card-icon")
                .with_attr("style", "height: 40px; margin-bottom: 12px"),
        )?;
    }
    doc.append(node, Element::new("h3").with_text(card.title))?;
    if let Some(text) = card.text {
        doc.append(node, Element::new("p").with_class("muted").with_text(text))?;
    }
    if !card.bullets.is_empty() {
        let list = doc.append(node, Element::new("ul").with_class("muted"))?;
        for bullet in card.bullets {
            doc.append(list, Element::new("li").with_text(*bullet))?;
        }
    }
    Ok(node)
}

fn render_contact(doc: &mut Document, parent: NodeId, contact: &ContactInfo, year: i32) -> Result<NodeId> {
    let section = doc.append(
        parent,
        Element::new("section")
            .with_id(contact.id)
            .with_class("section")
            .with_attr(
                "style",
                format!("padding: 96px 16px; background-color: {NAVY_BG_ALT}"),
            ),
    )?;
    let container = doc.append(
        section,
        group(Element::new("div").with_class("container").with_attr("style", "gap: 32px")),
    )?;
    let card = doc.append(
        container,
        item(
            Element::new("div")
                .with_class("card contact-card")
                .with_attr("style", format!("padding: 24px; gap: 16px; background-color: {CARD_BG}")),
        ),
    )?;
    doc.append(card, Element::new("h3").with_text(contact.heading))?;
    let line = doc.append(
        card,
        Element::new("p").with_class("muted").with_text(contact.email_label),
    )?;
    doc.append(
        line,
        Element::new("span")
            .with_class("highlight")
            .with_text(contact.email),
    )?;
    render_button(doc, card, &contact.button)?;
    doc.append(
        container,
        item(
            Element::new("p")
                .with_class("footer muted text-center")
                .with_text(format!("© {year} {}", contact.tagline)),
        ),
    )?;
    Ok(section)
}
