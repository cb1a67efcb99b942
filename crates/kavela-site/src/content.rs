//! The Kavela page as data.
//!
//! Everything here is immutable copy; [`crate::render`] turns it into a
//! document.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Gold fill.
    Primary,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub href: &'static str,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    /// Rendered after `headline` in the highlight color.
    pub highlight: &'static str,
    pub lede: &'static str,
    pub actions: &'static [Button],
    pub scroll_cue: NavLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub text: Option<&'static str>,
    pub bullets: &'static [&'static str],
    /// Draw the square icon placeholder above the title.
    pub icon: bool,
}

impl Card {
    pub const fn text(title: &'static str, text: &'static str) -> Self {
        Self {
            title,
            text: Some(text),
            bullets: &[],
            icon: false,
        }
    }

    pub const fn service(title: &'static str, text: &'static str) -> Self {
        Self {
            icon: true,
            ..Self::text(title, text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Base,
    Alt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Copy on the left, cards on the right.
    Split,
    /// Centered heading and intro above a row of cards.
    Grid,
    /// Centered heading, intro and action only.
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: Option<&'static str>,
    pub tone: Tone,
    pub arrangement: Arrangement,
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
    /// Gold-dotted bullet points under the paragraphs.
    pub points: &'static [&'static str],
    pub cards: &'static [Card],
    pub action: Option<Button>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactInfo {
    pub id: &'static str,
    pub heading: &'static str,
    pub email_label: &'static str,
    pub email: &'static str,
    pub button: Button,
    pub tagline: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteContent {
    pub title: &'static str,
    pub brand: &'static str,
    pub logo_src: &'static str,
    pub home: &'static str,
    pub nav: &'static [NavLink],
    pub header_action: Button,
    pub hero_id: &'static str,
    pub hero: Hero,
    pub sections: &'static [Section],
    pub contact: ContactInfo,
}

const fn primary(label: &'static str, href: &'static str) -> Button {
    Button {
        label,
        href,
        style: ButtonStyle::Primary,
    }
}

pub const KAVELA: SiteContent = SiteContent {
    title: "Kavela Consulting",
    brand: "Kavela",
    logo_src: "/8aa262cc-015b-4b77-9c83-a548e0c016b2.png",
    home: "#hero",
    nav: &[
        NavLink { label: "About", href: "#about" },
        NavLink { label: "Services", href: "#services" },
        NavLink { label: "Why Kavela", href: "#why" },
        NavLink { label: "Contact", href: "#contact" },
    ],
    header_action: primary("Work With Us", "#contact"),
    hero_id: "hero",
    hero: Hero {
        eyebrow: "Kavela Consulting",
        headline: "Strategic Consulting for",
        highlight: "Measurable Impact",
        lede: "We help leaders transform, grow, and operationalize strategy, blending strategic insight \
               with innovative, digital-first execution.",
        actions: &[
            primary("Contact Kavela", "#contact"),
            Button {
                label: "Our Services",
                href: "#services",
                style: ButtonStyle::Outline,
            },
        ],
        scroll_cue: NavLink { label: "Scroll ↓", href: "#about" },
    },
    sections: &[
        Section {
            id: Some("about"),
            tone: Tone::Base,
            arrangement: Arrangement::Split,
            heading: "About Kavela",
            paragraphs: &[
                "Kavela is a consulting and strategy firm helping businesses improve efficiency, optimize \
                 processes, and leverage digital transformation to reach their goals.",
                "We partner with leaders as trusted advisors, combining rigorous strategy with pragmatic \
                 execution to deliver outcomes that matter.",
            ],
            points: &[],
            cards: &[
                Card::text(
                    "Our Approach",
                    "Strategic insight blended with innovative solutions and execution discipline.",
                ),
                Card {
                    title: "Key Differentiators",
                    text: None,
                    bullets: &[
                        "Proven methodologies tailored to your context",
                        "Personalized strategies, no one-size-fits-all",
                        "Focus on measurable, sustainable impact",
                    ],
                    icon: false,
                },
            ],
            action: None,
        },
        Section {
            id: Some("services"),
            tone: Tone::Alt,
            arrangement: Arrangement::Grid,
            heading: "Our Services",
            paragraphs: &[
                "We translate strategy into execution through tailored workstreams and pragmatic delivery.",
            ],
            points: &[],
            cards: &[
                Card::service(
                    "Business Consulting",
                    "Identify efficiency levers, streamline operations, and improve profitability across \
                     functions.",
                ),
                Card::service(
                    "Strategic Planning",
                    "Define clear priorities and create actionable roadmaps for sustainable growth.",
                ),
                Card::service(
                    "Digital Transformation",
                    "Modernize tools, processes, and capabilities to unlock data-driven execution.",
                ),
            ],
            action: None,
        },
        Section {
            id: Some("why"),
            tone: Tone::Base,
            arrangement: Arrangement::Split,
            heading: "Why Choose Kavela",
            paragraphs: &[],
            points: &[
                "Tailored solutions, no templates.",
                "Proven track record delivering measurable outcomes.",
                "Commitment to excellence and client partnership.",
            ],
            cards: &[Card::text(
                "Our Promise",
                "Clear thinking, honest advice, and disciplined execution, aligned to your objectives and \
                 measured by outcomes.",
            )],
            action: None,
        },
        Section {
            id: None,
            tone: Tone::Alt,
            arrangement: Arrangement::Banner,
            heading: "Let’s Transform Your Business Together",
            paragraphs: &["Share your priorities and we’ll outline a focused, actionable plan."],
            points: &[],
            cards: &[],
            action: Some(primary("Start the Conversation", "#contact")),
        },
    ],
    contact: ContactInfo {
        id: "contact",
        heading: "Contact",
        email_label: "Email:",
        email: "contact@kavelaconsulting.com",
        button: primary("Email Us", "mailto:contact@kavela.co"),
        tagline: "Kavela. Excellence • Innovation • Measurable Impact.",
    },
};

impl SiteContent {
    /// Every in-page fragment the content links to, in appearance order.
    pub fn fragment_links(&self) -> Vec<&'static str> {
        let mut links = vec![self.home];
        links.extend(self.nav.iter().map(|link| link.href));
        links.push(self.header_action.href);
        links.extend(self.hero.actions.iter().map(|button| button.href));
        links.push(self.hero.scroll_cue.href);
        links.extend(
            self.sections
                .iter()
                .filter_map(|section| section.action)
                .map(|button| button.href),
        );
        links.push(self.contact.button.href);
        links.retain(|href| href.starts_with('#'));
        links
    }

    /// Identifiers of every element the page renders with an `id`.
    pub fn anchor_ids(&self) -> Vec<&'static str> {
        let mut ids = vec![self.hero_id];
        ids.extend(self.sections.iter().filter_map(|section| section.id));
        ids.push(self.contact.id);
        ids
    }
}
