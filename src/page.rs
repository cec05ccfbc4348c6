use gloo::events::EventListener;
use navspy_core::{NavBinding, PageConfig, SectionId};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement};

use crate::contact_form;
use crate::dom::{self, js_err};
use crate::nav;
use crate::runtime::{self, PageState};
use crate::scroll_spy;

pub(crate) struct SectionElement {
    pub(crate) id: SectionId,
    pub(crate) element: Element,
}

pub(crate) struct LinkElement {
    pub(crate) binding: NavBinding,
    pub(crate) element: Element,
}

pub(crate) struct PageElements {
    pub(crate) header: Option<HtmlElement>,
    pub(crate) sections: Vec<SectionElement>,
    pub(crate) links: Vec<LinkElement>,
    pub(crate) forms: Vec<HtmlFormElement>,
}

impl PageElements {
    pub(crate) fn discover(document: &Document, config: &PageConfig) -> Result<Self, String> {
        let header = document
            .query_selector(&config.header_selector)
            .map_err(js_err)?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let sections = dom::query_all(document, &config.section_selector)?
            .into_iter()
            .filter_map(|element| {
                let id = SectionId::parse(&element.id()).ok()?;
                Some(SectionElement { id, element })
            })
            .collect();

        let links = dom::query_all(document, &config.nav_link_selector)?
            .into_iter()
            .map(|element| {
                let href = element.get_attribute("href").unwrap_or_default();
                LinkElement {
                    binding: NavBinding::from_href(&href),
                    element,
                }
            })
            .collect();

        let forms = dom::query_all(document, &config.form_selector)?
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlFormElement>().ok())
            .collect();

        Ok(Self {
            header,
            sections,
            links,
            forms,
        })
    }

    pub(crate) fn section(&self, id: &SectionId) -> Option<&SectionElement> {
        self.sections.iter().find(|section| &section.id == id)
    }

    pub(crate) fn bindings(&self) -> Vec<NavBinding> {
        self.links.iter().map(|link| link.binding.clone()).collect()
    }
}

/// Attaches page behavior once the document is parsed.
pub(crate) fn start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        init_or_warn(&document);
        return;
    }
    let document_for_cb = document.clone();
    let listener = EventListener::once(&document, "DOMContentLoaded", move |_event| {
        init_or_warn(&document_for_cb);
    });
    runtime::keep_listener(listener);
}

fn init_or_warn(document: &Document) {
    if let Err(err) = init(document) {
        gloo::console::warn!("navspy: init failed", err);
    }
}

pub(crate) fn init(document: &Document) -> Result<(), String> {
    if runtime::is_installed() {
        return Ok(());
    }
    let config = dom::load_page_config();
    let elements = PageElements::discover(document, &config)?;
    gloo::console::log!(
        "navspy: wiring page",
        format!(
            "{} sections, {} links, {} forms",
            elements.sections.len(),
            elements.links.len(),
            elements.forms.len()
        )
    );
    let forms = elements.forms.clone();
    runtime::install(PageState::new(config.clone(), elements));

    nav::install_link_handlers();
    scroll_spy::install(document)?;
    for form in forms {
        contact_form::install(form, &config);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use navspy_core::{EvaluationTrigger, TrackerDecision, ACTIVE_CLASS};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FIXTURE: &str = r##"
        <header style="height: 80px">Studio</header>
        <nav>
            <a href="#uvod">Úvod</a>
            <a href="#sluzby">Služby</a>
            <a href="#">Nahoru</a>
        </nav>
        <section id="uvod" class="section" style="height: 400px"></section>
        <section id="sluzby" class="section" style="height: 400px"></section>
        <section class="section" style="height: 10px"></section>
        <form class="contact-form">
            <p class="form-status"></p>
            <button class="form-submit-btn" type="submit">Odeslat</button>
        </form>
    "##;

    fn mount_fixture() -> (Document, Element) {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(FIXTURE);
        document.body().unwrap().append_child(&root).unwrap();
        (document, root)
    }

    #[wasm_bindgen_test]
    fn discovers_page_elements() {
        let (document, root) = mount_fixture();
        let elements = PageElements::discover(&document, &PageConfig::default()).unwrap();
        assert!(elements.header.is_some());
        let ids: Vec<&str> = elements.sections.iter().map(|section| section.id.as_str()).collect();
        assert_eq!(ids, vec!["uvod", "sluzby"]);
        assert_eq!(elements.links.len(), 3);
        assert_eq!(elements.links[2].binding.target, None);
        assert_eq!(elements.forms.len(), 1);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn init_activates_exactly_one_link() {
        runtime::reset();
        let (document, root) = mount_fixture();
        init(&document).unwrap();

        let active = dom::query_all(&document, "nav a")
            .unwrap()
            .into_iter()
            .filter(|link| link.class_list().contains(ACTIVE_CLASS))
            .count();
        assert_eq!(active, 1);

        let missing = SectionId::parse("kontakt").unwrap();
        assert!(!nav::scroll_to_section(&missing));

        root.remove();
        runtime::reset();
    }

    fn active_links(document: &Document) -> Vec<String> {
        dom::query_all(document, "nav a")
            .unwrap()
            .into_iter()
            .filter(|link| link.class_list().contains(ACTIVE_CLASS))
            .filter_map(|link| link.get_attribute("href"))
            .collect()
    }

    #[wasm_bindgen_test]
    fn repeated_evaluation_keeps_active_link() {
        runtime::reset();
        let (document, root) = mount_fixture();
        web_sys::window().unwrap().scroll_to_with_x_and_y(0.0, 0.0);
        init(&document).unwrap();
        assert_eq!(active_links(&document).len(), 1);
        assert_eq!(
            scroll_spy::evaluate_now(EvaluationTrigger::Load),
            Some(TrackerDecision::Keep)
        );

        // the band may settle on another section once, then holds
        scroll_spy::evaluate_now(EvaluationTrigger::Scroll);
        let settled = active_links(&document);
        assert_eq!(settled.len(), 1);
        assert_eq!(
            scroll_spy::evaluate_now(EvaluationTrigger::Scroll),
            Some(TrackerDecision::Keep)
        );
        assert_eq!(active_links(&document), settled);

        root.remove();
        runtime::reset();
    }
}
