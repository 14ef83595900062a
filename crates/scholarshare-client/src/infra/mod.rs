pub mod emailjs;
pub mod realtime;
pub mod rest;
pub mod session;
