pub mod bmx;
