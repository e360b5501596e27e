mod health_records;
