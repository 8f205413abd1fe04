mod scripts;
mod view;

pub use view::TutorView;

#[cfg(test)]
pub(crate) use view::TutorTestHandles;
