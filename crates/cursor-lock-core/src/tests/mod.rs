mod binding;
mod capture;
mod geometry;
mod lock_machine;
