pub mod pkcs12;
