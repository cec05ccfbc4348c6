mod contact_form;
mod dom;
mod nav;
mod page;
mod runtime;
mod scroll_spy;

fn main() {
    page::start();
}
