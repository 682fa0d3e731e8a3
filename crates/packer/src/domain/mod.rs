pub mod a001_packing_record;
