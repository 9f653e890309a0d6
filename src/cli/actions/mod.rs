pub mod console;

#[derive(Debug)]
pub enum Action {
    Console { users_url: String },
}
