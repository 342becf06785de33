//! Text rendering of the list and detail views through Tera templates.

use serde::Serialize;
use tera::{Context, Tera};

use crate::view::{DetailView, ListView};

const LIST_TEMPLATE: &str = "list.txt";
const DETAIL_TEMPLATE: &str = "detail.txt";

#[derive(Serialize)]
struct ListPage<'a> {
    search: &'a str,
    view: &'a ListView,
}

#[derive(Serialize)]
struct DetailPage<'a> {
    view: &'a DetailView,
}

/// Templates are compiled into the binary so rendering does not depend on
/// the working directory.
#[derive(Clone, Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (LIST_TEMPLATE, include_str!("../templates/list.txt")),
            (DETAIL_TEMPLATE, include_str!("../templates/detail.txt")),
        ])?;
        Ok(Self { tera })
    }

    pub fn list(&self, search: &str, view: &ListView) -> Result<String, tera::Error> {
        let context = Context::from_serialize(ListPage { search, view })?;
        self.tera.render(LIST_TEMPLATE, &context)
    }

    pub fn detail(&self, view: &DetailView) -> Result<String, tera::Error> {
        let context = Context::from_serialize(DetailPage { view })?;
        self.tera.render(DETAIL_TEMPLATE, &context)
    }
}
